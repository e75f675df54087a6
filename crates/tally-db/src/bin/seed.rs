//! # Seed Data Generator
//!
//! Populates the database with a demo branch, cashiers, and a morning of
//! orders/refunds so the shift endpoints have something to reconcile.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! ## Generated Data
//! - 1 branch, 2 cashiers (`c-amina`, `c-bashir`)
//! - ~40 orders spread across the current UTC day, cash/card/wallet mix
//! - A handful of refunds
//!
//! Amounts and product picks are derived from the order index, so the
//! seed is deterministic.

use chrono::{Duration, NaiveTime, Utc};
use std::env;

use tally_core::{Branch, Cashier, OrderFact, OrderLine, PaymentMethod, RefundFact, StaffRole};
use tally_db::{Database, DbConfig};

/// Demo products that line items rotate through.
const PRODUCTS: &[(&str, &str)] = &[
    ("p-espresso", "Espresso"),
    ("p-latte", "Latte"),
    ("p-croissant", "Butter Croissant"),
    ("p-bagel", "Sesame Bagel"),
    ("p-juice", "Orange Juice"),
    ("p-cookie", "Oat Cookie"),
];

const METHODS: &[PaymentMethod] = &[
    PaymentMethod::Cash,
    PaymentMethod::Cash,
    PaymentMethod::Card,
    PaymentMethod::DigitalWallet,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = parse_db_path().unwrap_or_else(|| "./tally.db".to_string());
    println!("Seeding database at {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let staff = db.staff();
    let orders = db.orders();

    let branch = Branch {
        id: "b-downtown".to_string(),
        name: "Downtown".to_string(),
    };
    staff.insert_branch(&branch).await?;

    let cashiers = [
        Cashier {
            id: "c-amina".to_string(),
            name: "Amina".to_string(),
            role: StaffRole::Cashier,
            branch_id: Some(branch.id.clone()),
        },
        Cashier {
            id: "c-bashir".to_string(),
            name: "Bashir".to_string(),
            role: StaffRole::Cashier,
            branch_id: Some(branch.id.clone()),
        },
    ];
    for cashier in &cashiers {
        staff.insert_cashier(cashier).await?;
    }

    let day_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let mut order_count = 0usize;
    let mut refund_count = 0usize;

    for i in 0..40u32 {
        let cashier = &cashiers[(i % 2) as usize];
        let created_at = day_start + Duration::hours(8) + Duration::minutes((i * 11) as i64);
        let (product_id, product_name) = PRODUCTS[(i as usize) % PRODUCTS.len()];

        let order = OrderFact {
            id: format!("o-seed-{i:03}"),
            total_cents: Some(350 + (i as i64 % 7) * 125),
            payment_method: Some(METHODS[(i as usize) % METHODS.len()]),
            created_at: Some(created_at),
            items: vec![OrderLine {
                product_id: Some(product_id.to_string()),
                product_name: product_name.to_string(),
                quantity: 1 + (i as i64 % 3),
            }],
        };
        orders
            .insert_order(&cashier.id, Some(&branch.id), &order)
            .await?;
        order_count += 1;

        // Every ninth order comes back.
        if i % 9 == 0 {
            let refund = RefundFact {
                id: format!("r-seed-{i:03}"),
                amount_cents: Some(200),
                payment_method: Some(PaymentMethod::Cash),
                reason: Some("customer return".to_string()),
                created_at: Some(created_at + Duration::minutes(5)),
            };
            orders.insert_refund(&cashier.id, &refund).await?;
            refund_count += 1;
        }
    }

    println!(
        "Seeded 1 branch, {} cashiers, {} orders, {} refunds",
        cashiers.len(),
        order_count,
        refund_count
    );
    Ok(())
}

/// Parses `--db <path>` from the command line.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1).cloned())
}
