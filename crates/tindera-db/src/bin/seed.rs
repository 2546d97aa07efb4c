//! # Seed Data Generator
//!
//! Populates a store with demo clinic data for development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./tindera_dev.db)
//! cargo run -p tindera-db --bin seed
//!
//! # Specify database path
//! cargo run -p tindera-db --bin seed -- --db ./data/tindera.db
//! ```
//!
//! ## Generated Data
//! - The clinic's service catalog (consultations, lab work, supplies),
//!   a few with printable barcodes
//! - Invoices spread over the past 30 days so the dashboard chart has
//!   something to draw
//! - A handful of operating expenses

use std::env;

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tindera_core::{Expense, InvoiceDraft};
use tindera_db::scanner::generate_barcode;
use tindera_db::{ProductForm, Store, StoreConfig};

/// Service catalog: (title, details, category, price in centavos, barcode?).
const SERVICES: &[(&str, &str, &str, i64, bool)] = &[
    ("General Consultation", "Walk-in consultation with the physician on duty", "Consultation", 30000, false),
    ("Follow-up Consultation", "Return visit within two weeks", "Consultation", 20000, false),
    ("Medical Certificate", "Fit-to-work or school certificate", "Consultation", 15000, false),
    ("Complete Blood Count", "CBC with platelet count", "Laboratory", 25000, false),
    ("Urinalysis", "Routine urinalysis", "Laboratory", 15000, false),
    ("Fecalysis", "Routine stool examination", "Laboratory", 15000, false),
    ("Fasting Blood Sugar", "FBS, 8-hour fast required", "Laboratory", 20000, false),
    ("Lipid Profile", "Cholesterol, triglycerides, HDL, LDL", "Laboratory", 60000, false),
    ("Chest X-Ray", "PA view with radiologist reading", "Imaging", 40000, false),
    ("ECG", "12-lead electrocardiogram", "Imaging", 35000, false),
    ("Wound Dressing", "Cleaning and dressing, small wound", "Procedure", 25000, false),
    ("Ear Irrigation", "Both ears", "Procedure", 30000, false),
    ("Nebulization", "Per session, medication included", "Procedure", 20000, false),
    ("Vitamin B Complex Ampoule", "Per ampoule, injection fee included", "Supplies", 9000, true),
    ("Paracetamol 500mg", "Per 10 tablets", "Supplies", 5000, true),
    ("Amoxicillin 500mg", "Per 21 capsules", "Supplies", 21000, true),
    ("Surgical Face Mask", "Box of 50", "Supplies", 15000, true),
];

const CUSTOMERS: &[&str] = &[
    "Maria Santos",
    "Jose Ramos",
    "Ana Reyes",
    "Paolo Garcia",
    "Liza Aquino",
    "Ramon Cruz",
    "Grace Villanueva",
    "Nestor Dela Cruz",
    "Carmela Bautista",
    "Eduardo Lim",
];

const EXPENSES: &[(&str, i64)] = &[
    ("Electricity bill", 450000),
    ("Water bill", 80000),
    ("Reagent restock", 320000),
    ("Aircon cleaning", 150000),
    ("Internet", 169900),
    ("No details", 50000),
];

const INVOICE_COUNT: usize = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tindera_db=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = "./tindera_dev.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tindera POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tindera_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tindera POS Seed Data Generator");
    println!("==================================");
    println!("Database: {db_path}");
    println!();

    let store = Store::open(StoreConfig::new(&db_path)).await?;
    println!("✓ Store opened, migrations applied");

    let existing = store.products().list().await?.len();
    if existing > 0 {
        println!("⚠ Store already has {existing} products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    let mut catalog = Vec::with_capacity(SERVICES.len());
    for (title, details, category, price_cents, with_barcode) in SERVICES {
        let product = store
            .products()
            .add(ProductForm {
                title: title.to_string(),
                details: details.to_string(),
                price_cents: *price_cents,
                category: Some(category.to_string()),
                stock: 50,
                barcode: with_barcode.then(generate_barcode),
            })
            .await?;
        catalog.push(product);
    }
    println!("✓ {} catalog services created", catalog.len());

    // Invoices spread over the past 30 days
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut recorded = 0;
    for _ in 0..INVOICE_COUNT {
        let customer = CUSTOMERS.choose(&mut rng).copied().unwrap_or("Walk-in");
        let mut draft = InvoiceDraft::new(customer);

        for _ in 0..rng.gen_range(1..=3) {
            if let Some(product) = catalog.choose(&mut rng) {
                draft.add_product(product);
            }
        }
        if rng.gen_bool(0.25) {
            draft.set_discount_percent(*[10.0, 20.0].choose(&mut rng).unwrap_or(&10.0));
        }

        let finished_at = now
            - Duration::days(rng.gen_range(0..30))
            - Duration::minutes(rng.gen_range(0..720));
        store.transactions().record_at(draft, finished_at).await?;
        recorded += 1;
    }
    println!("✓ {recorded} invoices recorded over the past 30 days");

    // Expenses, backdated through the generic collection
    let expenses = store.collection::<Expense>();
    for (idx, (note, amount_cents)) in EXPENSES.iter().enumerate() {
        expenses
            .push(&Expense {
                id: String::new(),
                amount_cents: *amount_cents,
                note: note.to_string(),
                date: Some(now - Duration::days((idx as i64 * 5) % 30)),
            })
            .await?;
    }
    println!("✓ {} expenses recorded", EXPENSES.len());

    println!();
    println!("Done. Open the dashboard to see the demo data.");
    Ok(())
}
