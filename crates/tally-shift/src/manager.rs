//! # Shift Manager
//!
//! Orchestrates the shift state machine:
//!
//! ```text
//! NOT_STARTED ──start──► OPEN ──end──► CLOSED ──end──► CLOSED (re-close)
//! ```
//!
//! One transition to OPEN per cashier per calendar day; no pause/resume.
//! Identity is an explicit `cashier_id` parameter on every call - the
//! manager never reaches into ambient session state.
//!
//! ## Read vs. Write
//! - [`ShiftManager::end`] is the only operation that mutates persisted
//!   totals.
//! - [`ShiftManager::current_progress`] is read-only and side-effect
//!   free; it can be polled at any frequency and never serializes against
//!   other progress calls or against `end`.
//! - A failed feed read aborts before anything is written, so a session
//!   is never left partially mutated.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use tally_core::{summarize, CoreError, RefundFact, SalesSummary, ShiftSession};

use crate::error::ShiftResult;
use crate::store::{SalesFeed, ShiftStore, StaffDirectory, StoreError};

// =============================================================================
// Shift Overview
// =============================================================================

/// A session together with its computed reconciliation.
///
/// The summary and refund list are derived per request and never stored;
/// `session` is `None` only for the "no active shift" progress view,
/// which renders as an all-zero summary instead of an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftOverview {
    pub session: Option<ShiftSession>,
    pub summary: SalesSummary,
    pub refunds: Vec<RefundFact>,
}

impl ShiftOverview {
    /// The "no active shift" view: zero totals, empty lists.
    pub fn empty() -> Self {
        ShiftOverview {
            session: None,
            summary: SalesSummary::empty(),
            refunds: Vec::new(),
        }
    }
}

// =============================================================================
// Shift Manager
// =============================================================================

/// The lifecycle engine. Cheap to clone; collaborators are shared.
#[derive(Clone)]
pub struct ShiftManager {
    shifts: Arc<dyn ShiftStore>,
    sales: Arc<dyn SalesFeed>,
    staff: Arc<dyn StaffDirectory>,
}

impl ShiftManager {
    /// Creates a manager over the given collaborators.
    pub fn new(
        shifts: Arc<dyn ShiftStore>,
        sales: Arc<dyn SalesFeed>,
        staff: Arc<dyn StaffDirectory>,
    ) -> Self {
        ShiftManager {
            shifts,
            sales,
            staff,
        }
    }

    // -------------------------------------------------------------------------
    // start
    // -------------------------------------------------------------------------

    /// Opens a shift for a cashier, idempotently within a calendar day.
    ///
    /// ## Behavior
    /// - A session already started on the same UTC day is returned
    ///   unchanged - open or closed. Returning a closed session instead
    ///   of opening a second one is deliberate: one session per cashier
    ///   per day.
    /// - Branch resolution: explicit `branch_id`, else the cashier's
    ///   assigned branch, else `NoBranch`.
    /// - Losing a creation race against a concurrent `start` adopts the
    ///   winner's session instead of erroring.
    pub async fn start(
        &self,
        cashier_id: &str,
        branch_id: Option<&str>,
        shift_start: Option<DateTime<Utc>>,
    ) -> ShiftResult<ShiftSession> {
        let cashier = self
            .staff
            .cashier(cashier_id)
            .await?
            .ok_or_else(|| CoreError::CashierNotFound(cashier_id.to_string()))?;

        let shift_start = shift_start.unwrap_or_else(Utc::now);
        let (day_start, day_end) = calendar_day(shift_start);

        if let Some(existing) = self
            .shifts
            .find_for_cashier_on_day(cashier_id, day_start, day_end)
            .await?
        {
            debug!(
                shift_id = %existing.id,
                cashier_id = %cashier_id,
                open = existing.is_open(),
                "Shift already exists for this day - returning it"
            );
            return Ok(existing);
        }

        let branch_id = match branch_id {
            Some(explicit) => {
                self.staff
                    .branch(explicit)
                    .await?
                    .ok_or_else(|| CoreError::BranchNotFound(explicit.to_string()))?
                    .id
            }
            None => cashier
                .branch_id
                .clone()
                .ok_or_else(|| CoreError::NoBranch(cashier.id.clone()))?,
        };

        let now = Utc::now();
        let session = ShiftSession {
            id: Uuid::new_v4().to_string(),
            cashier_id: cashier.id.clone(),
            branch_id,
            shift_start,
            shift_end: None,
            total_sales_cents: 0,
            total_refunds_cents: 0,
            net_sales_cents: 0,
            total_orders: 0,
            created_at: now,
            updated_at: now,
        };

        match self.shifts.save(session).await {
            Ok(saved) => {
                info!(
                    shift_id = %saved.id,
                    cashier_id = %saved.cashier_id,
                    branch_id = %saved.branch_id,
                    "Shift opened"
                );
                Ok(saved)
            }
            // Another start for the same cashier won the insert race.
            // The invariant holds; adopt the winner's session.
            Err(conflict @ StoreError::Conflict(_)) => {
                match self.shifts.find_open_for_cashier(cashier_id).await? {
                    Some(winner) => {
                        debug!(
                            shift_id = %winner.id,
                            cashier_id = %cashier_id,
                            "Lost start race - returning winner's session"
                        );
                        Ok(winner)
                    }
                    None => Err(conflict.into()),
                }
            }
            Err(other) => Err(other.into()),
        }
    }

    // -------------------------------------------------------------------------
    // end
    // -------------------------------------------------------------------------

    /// Closes a shift and fixes its totals.
    ///
    /// With no `shift_id`, the cashier's most recent open session is
    /// closed (`NoActiveShift` if there is none). `shift_end` defaults
    /// to now.
    ///
    /// Ending an already-closed session recomputes over the *stored*
    /// `[shift_start, shift_end)` window and re-persists - a correction
    /// pass, not an error. Callers relying on closed shifts being
    /// immutable should be aware totals can be overwritten here.
    pub async fn end(
        &self,
        cashier_id: &str,
        shift_id: Option<&str>,
        shift_end: Option<DateTime<Utc>>,
    ) -> ShiftResult<ShiftOverview> {
        let mut session = match shift_id {
            Some(id) => self
                .shifts
                .find_by_id(id)
                .await?
                .ok_or_else(|| CoreError::ShiftNotFound(id.to_string()))?,
            None => self
                .shifts
                .find_open_for_cashier(cashier_id)
                .await?
                .ok_or_else(|| CoreError::NoActiveShift(cashier_id.to_string()))?,
        };

        let window_end = match session.shift_end {
            // Re-close: the stored window wins over the request's.
            Some(stored) => stored,
            None => shift_end.unwrap_or_else(Utc::now),
        };

        // Pull and aggregate before touching the session, so a failed
        // read leaves it unmodified.
        let orders = self
            .sales
            .orders_for_cashier_in_window(&session.cashier_id, session.shift_start, window_end)
            .await?;
        let refunds = self
            .sales
            .refunds_for_cashier_in_window(&session.cashier_id, session.shift_start, window_end)
            .await?;
        let summary = summarize(&orders, &refunds);

        session.total_sales_cents = summary.total_sales_cents;
        session.total_refunds_cents = summary.total_refunds_cents;
        session.net_sales_cents = summary.net_sales_cents;
        session.total_orders = summary.total_orders;
        session.shift_end = Some(window_end);
        session.updated_at = Utc::now();

        let saved = self.shifts.save(session).await?;

        info!(
            shift_id = %saved.id,
            cashier_id = %saved.cashier_id,
            total_sales_cents = saved.total_sales_cents,
            net_sales_cents = saved.net_sales_cents,
            total_orders = saved.total_orders,
            "Shift closed"
        );

        Ok(ShiftOverview {
            session: Some(saved),
            summary,
            refunds,
        })
    }

    // -------------------------------------------------------------------------
    // current progress
    // -------------------------------------------------------------------------

    /// Live reconciliation of the cashier's open shift over
    /// `[shift_start, now)`.
    ///
    /// Nothing is written back: polling this at any frequency leaves
    /// persisted state byte-identical. With no open shift the empty
    /// overview is returned so the UI can always render a "no active
    /// shift" state without special-casing.
    pub async fn current_progress(&self, cashier_id: &str) -> ShiftResult<ShiftOverview> {
        self.staff
            .cashier(cashier_id)
            .await?
            .ok_or_else(|| CoreError::CashierNotFound(cashier_id.to_string()))?;

        let session = match self.shifts.find_open_for_cashier(cashier_id).await? {
            Some(session) => session,
            None => return Ok(ShiftOverview::empty()),
        };

        self.overview_for(session, Utc::now()).await
    }

    // -------------------------------------------------------------------------
    // queries
    // -------------------------------------------------------------------------

    /// A session by id, with its breakdown re-derived over the session's
    /// own window (up to now for a still-open session).
    pub async fn get_by_id(&self, id: &str) -> ShiftResult<ShiftOverview> {
        let session = self
            .shifts
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ShiftNotFound(id.to_string()))?;

        let window_end = session.shift_end.unwrap_or_else(Utc::now);
        self.overview_for(session, window_end).await
    }

    /// The session a cashier started on a given UTC calendar day.
    pub async fn get_by_cashier_and_date(
        &self,
        cashier_id: &str,
        date: NaiveDate,
    ) -> ShiftResult<ShiftOverview> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        let session = self
            .shifts
            .find_for_cashier_on_day(cashier_id, day_start, day_end)
            .await?
            .ok_or_else(|| {
                CoreError::ShiftNotFound(format!("cashier {cashier_id} on {date}"))
            })?;

        let window_end = session.shift_end.unwrap_or_else(Utc::now);
        self.overview_for(session, window_end).await
    }

    /// All sessions worked at a branch (persisted totals only).
    pub async fn list_by_branch(&self, branch_id: &str) -> ShiftResult<Vec<ShiftSession>> {
        Ok(self.shifts.find_by_branch(branch_id).await?)
    }

    /// All sessions for a cashier (persisted totals only).
    pub async fn list_by_cashier(&self, cashier_id: &str) -> ShiftResult<Vec<ShiftSession>> {
        Ok(self.shifts.find_by_cashier(cashier_id).await?)
    }

    /// Every session (persisted totals only).
    pub async fn list_all(&self) -> ShiftResult<Vec<ShiftSession>> {
        Ok(self.shifts.find_all().await?)
    }

    // -------------------------------------------------------------------------
    // helpers
    // -------------------------------------------------------------------------

    /// Builds the computed view for a session window. Read-only.
    async fn overview_for(
        &self,
        session: ShiftSession,
        window_end: DateTime<Utc>,
    ) -> ShiftResult<ShiftOverview> {
        let orders = self
            .sales
            .orders_for_cashier_in_window(&session.cashier_id, session.shift_start, window_end)
            .await?;
        let refunds = self
            .sales
            .refunds_for_cashier_in_window(&session.cashier_id, session.shift_start, window_end)
            .await?;
        let summary = summarize(&orders, &refunds);

        Ok(ShiftOverview {
            session: Some(session),
            summary,
            refunds,
        })
    }
}

/// The UTC calendar day containing `at`, as a half-open window.
fn calendar_day(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (day_start, day_start + Duration::days(1))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreResult;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tally_core::{Branch, Cashier, OrderFact, PaymentMethod, StaffRole};

    // -------------------------------------------------------------------------
    // In-memory fakes
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct MemShiftStore {
        sessions: Mutex<Vec<ShiftSession>>,
        saves: AtomicUsize,
        /// When set, the next insert loses the race: this session is
        /// written first and the insert fails with Conflict.
        race_winner: Mutex<Option<ShiftSession>>,
    }

    impl MemShiftStore {
        fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        fn open_sessions_for(&self, cashier_id: &str) -> usize {
            self.sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.cashier_id == cashier_id && s.is_open())
                .count()
        }

        fn stored(&self, id: &str) -> Option<ShiftSession> {
            self.sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned()
        }
    }

    #[async_trait]
    impl ShiftStore for MemShiftStore {
        async fn save(&self, session: ShiftSession) -> StoreResult<ShiftSession> {
            self.saves.fetch_add(1, Ordering::SeqCst);

            if let Some(winner) = self.race_winner.lock().unwrap().take() {
                self.sessions.lock().unwrap().push(winner);
                return Err(StoreError::Conflict(
                    "one open shift per cashier".to_string(),
                ));
            }

            let mut sessions = self.sessions.lock().unwrap();
            let open_elsewhere = session.is_open()
                && sessions
                    .iter()
                    .any(|s| s.cashier_id == session.cashier_id && s.is_open() && s.id != session.id);
            if open_elsewhere {
                return Err(StoreError::Conflict(
                    "one open shift per cashier".to_string(),
                ));
            }

            match sessions.iter_mut().find(|s| s.id == session.id) {
                Some(slot) => *slot = session.clone(),
                None => sessions.push(session.clone()),
            }
            Ok(session)
        }

        async fn find_by_id(&self, id: &str) -> StoreResult<Option<ShiftSession>> {
            Ok(self.stored(id))
        }

        async fn find_open_for_cashier(
            &self,
            cashier_id: &str,
        ) -> StoreResult<Option<ShiftSession>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.cashier_id == cashier_id && s.is_open())
                .max_by_key(|s| s.shift_start)
                .cloned())
        }

        async fn find_for_cashier_on_day(
            &self,
            cashier_id: &str,
            day_start: DateTime<Utc>,
            day_end: DateTime<Utc>,
        ) -> StoreResult<Option<ShiftSession>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| {
                    s.cashier_id == cashier_id
                        && s.shift_start >= day_start
                        && s.shift_start < day_end
                })
                .cloned())
        }

        async fn find_by_branch(&self, branch_id: &str) -> StoreResult<Vec<ShiftSession>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.branch_id == branch_id)
                .cloned()
                .collect())
        }

        async fn find_by_cashier(&self, cashier_id: &str) -> StoreResult<Vec<ShiftSession>> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.cashier_id == cashier_id)
                .cloned()
                .collect())
        }

        async fn find_all(&self) -> StoreResult<Vec<ShiftSession>> {
            Ok(self.sessions.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct MemSalesFeed {
        orders: Mutex<Vec<(String, OrderFact)>>,
        refunds: Mutex<Vec<(String, RefundFact)>>,
    }

    impl MemSalesFeed {
        fn add_order(&self, cashier_id: &str, order: OrderFact) {
            self.orders
                .lock()
                .unwrap()
                .push((cashier_id.to_string(), order));
        }

        fn add_refund(&self, cashier_id: &str, refund: RefundFact) {
            self.refunds
                .lock()
                .unwrap()
                .push((cashier_id.to_string(), refund));
        }
    }

    #[async_trait]
    impl SalesFeed for MemSalesFeed {
        async fn orders_for_cashier_in_window(
            &self,
            cashier_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> StoreResult<Vec<OrderFact>> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .filter(|(c, o)| {
                    c == cashier_id
                        && o.created_at.is_some_and(|t| t >= start && t < end)
                })
                .map(|(_, o)| o.clone())
                .collect())
        }

        async fn refunds_for_cashier_in_window(
            &self,
            cashier_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> StoreResult<Vec<RefundFact>> {
            Ok(self
                .refunds
                .lock()
                .unwrap()
                .iter()
                .filter(|(c, r)| {
                    c == cashier_id
                        && r.created_at.is_some_and(|t| t >= start && t < end)
                })
                .map(|(_, r)| r.clone())
                .collect())
        }
    }

    #[derive(Default)]
    struct MemStaff {
        cashiers: HashMap<String, Cashier>,
        branches: HashMap<String, Branch>,
    }

    #[async_trait]
    impl StaffDirectory for MemStaff {
        async fn cashier(&self, id: &str) -> StoreResult<Option<Cashier>> {
            Ok(self.cashiers.get(id).cloned())
        }

        async fn branch(&self, id: &str) -> StoreResult<Option<Branch>> {
            Ok(self.branches.get(id).cloned())
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    struct Harness {
        manager: ShiftManager,
        shifts: Arc<MemShiftStore>,
        sales: Arc<MemSalesFeed>,
    }

    fn harness() -> Harness {
        let mut staff = MemStaff::default();
        staff.branches.insert(
            "b-1".to_string(),
            Branch {
                id: "b-1".to_string(),
                name: "Downtown".to_string(),
            },
        );
        staff.cashiers.insert(
            "c-1".to_string(),
            Cashier {
                id: "c-1".to_string(),
                name: "Amina".to_string(),
                role: StaffRole::Cashier,
                branch_id: Some("b-1".to_string()),
            },
        );
        staff.cashiers.insert(
            "c-floating".to_string(),
            Cashier {
                id: "c-floating".to_string(),
                name: "Floater".to_string(),
                role: StaffRole::Cashier,
                branch_id: None,
            },
        );

        let shifts = Arc::new(MemShiftStore::default());
        let sales = Arc::new(MemSalesFeed::default());
        let manager = ShiftManager::new(shifts.clone(), sales.clone(), Arc::new(staff));

        Harness {
            manager,
            shifts,
            sales,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    fn order_at(id: &str, cents: i64, method: PaymentMethod, when: DateTime<Utc>) -> OrderFact {
        OrderFact {
            id: id.to_string(),
            total_cents: Some(cents),
            payment_method: Some(method),
            created_at: Some(when),
            items: Vec::new(),
        }
    }

    fn refund_at(id: &str, cents: i64, when: DateTime<Utc>) -> RefundFact {
        RefundFact {
            id: id.to_string(),
            amount_cents: Some(cents),
            payment_method: Some(PaymentMethod::Cash),
            reason: Some("customer return".to_string()),
            created_at: Some(when),
        }
    }

    // -------------------------------------------------------------------------
    // start
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_start_opens_session_with_cashiers_branch() {
        let h = harness();

        let session = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        assert!(session.is_open());
        assert_eq!(session.cashier_id, "c-1");
        assert_eq!(session.branch_id, "b-1");
        assert_eq!(session.shift_start, at(9, 0));
        assert_eq!(session.total_sales_cents, 0);
    }

    #[tokio::test]
    async fn test_start_is_idempotent_within_day() {
        let h = harness();

        let first = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();
        let second = h.manager.start("c-1", None, Some(at(13, 30))).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(h.shifts.open_sessions_for("c-1"), 1);
    }

    #[tokio::test]
    async fn test_start_next_day_opens_new_session() {
        let h = harness();

        let first = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();
        h.manager
            .end("c-1", None, Some(at(17, 0)))
            .await
            .unwrap();

        let next_day = Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
        let second = h.manager.start("c-1", None, Some(next_day)).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.is_open());
    }

    #[tokio::test]
    async fn test_start_returns_closed_same_day_session() {
        let h = harness();

        let first = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();
        h.manager
            .end("c-1", Some(&first.id), Some(at(12, 0)))
            .await
            .unwrap();

        // Same-day restart hands back the closed session; it is not
        // silently reopened and no second session appears.
        let again = h.manager.start("c-1", None, Some(at(14, 0))).await.unwrap();
        assert_eq!(again.id, first.id);
        assert!(!again.is_open());
        assert_eq!(h.shifts.open_sessions_for("c-1"), 0);
    }

    #[tokio::test]
    async fn test_start_unknown_cashier() {
        let h = harness();

        let err = h.manager.start("ghost", None, None).await.unwrap_err();
        assert!(matches!(
            err,
            crate::ShiftError::Domain(CoreError::CashierNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_start_unknown_branch() {
        let h = harness();

        let err = h
            .manager
            .start("c-1", Some("b-ghost"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::ShiftError::Domain(CoreError::BranchNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_start_no_branch_determinable() {
        let h = harness();

        let err = h.manager.start("c-floating", None, None).await.unwrap_err();
        assert!(matches!(
            err,
            crate::ShiftError::Domain(CoreError::NoBranch(_))
        ));
    }

    #[tokio::test]
    async fn test_start_explicit_branch_wins_over_assignment() {
        let h = harness();
        // c-floating has no branch of its own but names one explicitly.
        let session = h
            .manager
            .start("c-floating", Some("b-1"), Some(at(8, 0)))
            .await
            .unwrap();
        assert_eq!(session.branch_id, "b-1");
    }

    #[tokio::test]
    async fn test_start_conflict_adopts_winner() {
        let h = harness();

        let now = Utc::now();
        let winner = ShiftSession {
            id: "s-winner".to_string(),
            cashier_id: "c-1".to_string(),
            branch_id: "b-1".to_string(),
            shift_start: at(8, 59),
            shift_end: None,
            total_sales_cents: 0,
            total_refunds_cents: 0,
            net_sales_cents: 0,
            total_orders: 0,
            created_at: now,
            updated_at: now,
        };
        // The competing start lands between our day-check and our insert.
        *h.shifts.race_winner.lock().unwrap() = Some(winner);

        let session = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();
        assert_eq!(session.id, "s-winner");
        assert_eq!(h.shifts.open_sessions_for("c-1"), 1);
    }

    // -------------------------------------------------------------------------
    // end
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_end_reconciles_and_persists() {
        let h = harness();
        h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        h.sales
            .add_order("c-1", order_at("o-1", 1000, PaymentMethod::Cash, at(9, 10)));
        h.sales
            .add_order("c-1", order_at("o-2", 2000, PaymentMethod::Card, at(9, 20)));
        h.sales
            .add_order("c-1", order_at("o-3", 3000, PaymentMethod::Cash, at(9, 30)));
        h.sales.add_refund("c-1", refund_at("r-1", 500, at(9, 40)));

        let overview = h
            .manager
            .end("c-1", None, Some(at(10, 0)))
            .await
            .unwrap();

        let session = overview.session.unwrap();
        assert_eq!(session.shift_end, Some(at(10, 0)));
        assert_eq!(session.total_sales_cents, 6000);
        assert_eq!(session.total_refunds_cents, 500);
        assert_eq!(session.net_sales_cents, 5500);
        assert_eq!(session.total_orders, 3);

        // Totals are on the persisted row too, not only on the view.
        let stored = h.shifts.stored(&session.id).unwrap();
        assert_eq!(stored.net_sales_cents, 5500);
        assert!(!stored.is_open());

        // The computed breakdown rides along without being stored.
        assert_eq!(overview.summary.total_orders, 3);
        assert_eq!(overview.refunds.len(), 1);
        let cash = overview
            .summary
            .payment_summaries
            .iter()
            .find(|p| p.method == PaymentMethod::Cash)
            .unwrap();
        assert_eq!(cash.total_cents, 4000);
        assert_eq!(cash.transaction_count, 2);
    }

    #[tokio::test]
    async fn test_end_excludes_facts_outside_window() {
        let h = harness();
        h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        h.sales
            .add_order("c-1", order_at("o-early", 100, PaymentMethod::Cash, at(8, 59)));
        h.sales
            .add_order("c-1", order_at("o-in", 1000, PaymentMethod::Cash, at(9, 30)));
        // Half-open window: an order exactly at shift_end is excluded.
        h.sales
            .add_order("c-1", order_at("o-at-end", 100, PaymentMethod::Cash, at(10, 0)));

        let overview = h
            .manager
            .end("c-1", None, Some(at(10, 0)))
            .await
            .unwrap();

        assert_eq!(overview.summary.total_orders, 1);
        assert_eq!(overview.summary.total_sales_cents, 1000);
    }

    #[tokio::test]
    async fn test_end_without_open_shift() {
        let h = harness();

        let err = h.manager.end("c-1", None, None).await.unwrap_err();
        assert!(matches!(
            err,
            crate::ShiftError::Domain(CoreError::NoActiveShift(_))
        ));
    }

    #[tokio::test]
    async fn test_end_unknown_shift_id() {
        let h = harness();

        let err = h
            .manager
            .end("c-1", Some("s-ghost"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::ShiftError::Domain(CoreError::ShiftNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reclose_recomputes_over_stored_window() {
        let h = harness();
        let session = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        h.sales
            .add_order("c-1", order_at("o-1", 1000, PaymentMethod::Cash, at(9, 30)));
        h.manager
            .end("c-1", None, Some(at(10, 0)))
            .await
            .unwrap();

        // A correction lands inside the stored window after the close...
        h.sales
            .add_order("c-1", order_at("o-late-entry", 500, PaymentMethod::Cash, at(9, 45)));
        // ...and noise lands after the stored end.
        h.sales
            .add_order("c-1", order_at("o-next", 9999, PaymentMethod::Cash, at(11, 0)));

        let overview = h
            .manager
            .end("c-1", Some(&session.id), Some(at(12, 0)))
            .await
            .unwrap();

        let reclosed = overview.session.unwrap();
        // Stored end wins over the request's 12:00.
        assert_eq!(reclosed.shift_end, Some(at(10, 0)));
        assert_eq!(reclosed.total_sales_cents, 1500);
        assert_eq!(reclosed.total_orders, 2);
    }

    // -------------------------------------------------------------------------
    // current progress
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_progress_is_empty_without_open_shift() {
        let h = harness();

        let overview = h.manager.current_progress("c-1").await.unwrap();
        assert!(overview.session.is_none());
        assert_eq!(overview.summary.total_sales_cents, 0);
        assert!(overview.summary.payment_summaries.is_empty());
        assert!(overview.refunds.is_empty());
    }

    #[tokio::test]
    async fn test_progress_computes_live_totals() {
        let h = harness();
        h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        h.sales
            .add_order("c-1", order_at("o-1", 1000, PaymentMethod::Cash, at(9, 10)));
        h.sales.add_refund("c-1", refund_at("r-1", 250, at(9, 20)));

        let overview = h.manager.current_progress("c-1").await.unwrap();
        assert_eq!(overview.summary.total_sales_cents, 1000);
        assert_eq!(overview.summary.total_refunds_cents, 250);
        assert_eq!(overview.summary.net_sales_cents, 750);
        assert!(overview.session.unwrap().is_open());
    }

    #[tokio::test]
    async fn test_progress_never_mutates_the_store() {
        let h = harness();
        let session = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();
        h.sales
            .add_order("c-1", order_at("o-1", 1000, PaymentMethod::Cash, at(9, 10)));

        let saves_before = h.shifts.save_count();
        for _ in 0..5 {
            h.manager.current_progress("c-1").await.unwrap();
        }

        assert_eq!(h.shifts.save_count(), saves_before);
        // Persisted totals still untouched.
        let stored = h.shifts.stored(&session.id).unwrap();
        assert_eq!(stored.total_sales_cents, 0);
        assert!(stored.is_open());
    }

    // -------------------------------------------------------------------------
    // queries
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_get_by_id_rederives_breakdown() {
        let h = harness();
        h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();
        h.sales
            .add_order("c-1", order_at("o-1", 1000, PaymentMethod::Card, at(9, 10)));
        let closed = h
            .manager
            .end("c-1", None, Some(at(10, 0)))
            .await
            .unwrap()
            .session
            .unwrap();

        let overview = h.manager.get_by_id(&closed.id).await.unwrap();
        assert_eq!(overview.summary.total_sales_cents, 1000);
        assert_eq!(overview.summary.payment_summaries.len(), 1);
        assert_eq!(
            overview.summary.payment_summaries[0].method,
            PaymentMethod::Card
        );
    }

    #[tokio::test]
    async fn test_get_by_cashier_and_date() {
        let h = harness();
        let session = h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        let found = h
            .manager
            .get_by_cashier_and_date("c-1", NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
            .await
            .unwrap();
        assert_eq!(found.session.unwrap().id, session.id);

        let err = h
            .manager
            .get_by_cashier_and_date("c-1", NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::ShiftError::Domain(CoreError::ShiftNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_queries() {
        let h = harness();
        h.manager.start("c-1", None, Some(at(9, 0))).await.unwrap();

        assert_eq!(h.manager.list_by_branch("b-1").await.unwrap().len(), 1);
        assert_eq!(h.manager.list_by_cashier("c-1").await.unwrap().len(), 1);
        assert_eq!(h.manager.list_all().await.unwrap().len(), 1);
        assert!(h.manager.list_by_branch("b-ghost").await.unwrap().is_empty());
    }
}
