//! # Seed Data Loader
//!
//! Populates an empty database with a small demo company.
//!
//! ## Usage
//! ```bash
//! # Seed ./stockmaster.db
//! cargo run -p stockmaster-api --bin seed
//!
//! # Specify database path
//! cargo run -p stockmaster-api --bin seed -- --db ./data/stockmaster.db
//! ```
//!
//! ## Demo Data
//! - 3 users (manager, staff, admin), password `password123`
//! - 2 warehouses (WH, SF) with 3 locations
//! - 5 products across Furniture, Lighting, Electronics
//! - 4 stock cells
//! - 6 operations, one item each
//!
//! Skips everything when the database already has users.

use std::env;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use stockmaster_api::auth::hash_password;
use stockmaster_core::{
    LocationInput, Money, NewOperationItem, OperationInput, OperationStatus, OperationType,
    ProductInput, Role, StockUpsert, WarehouseInput,
};
use stockmaster_db::{Database, DbConfig};

const DEMO_PASSWORD: &str = "password123";

/// (name, email, role)
const USERS: &[(&str, &str, Role)] = &[
    ("John Manager", "demo.manager@stockmaster.test", Role::InventoryManager),
    ("Jane Staff", "staff@stockmaster.test", Role::WarehouseStaff),
    ("Admin User", "admin@stockmaster.test", Role::Admin),
];

/// (name, sku, category, reorder level, description)
const PRODUCTS: &[(&str, &str, &str, i64, &str)] = &[
    ("Office Chair Executive", "OC-001", "Furniture", 20, "Ergonomic executive office chair"),
    ("Desk Lamp LED", "DL-002", "Lighting", 15, "Energy efficient LED desk lamp"),
    ("Keyboard Mechanical", "KB-003", "Electronics", 10, "RGB mechanical gaming keyboard"),
    ("Monitor 27inch", "MN-004", "Electronics", 15, "27 inch 4K monitor"),
    ("Standing Desk", "SD-005", "Furniture", 10, "Electric height adjustable standing desk"),
];

/// One demo operation: header, its single item and who is responsible.
struct DemoOperation {
    reference: &'static str,
    op_type: OperationType,
    status: OperationStatus,
    from: &'static str,
    to: &'static str,
    contact: Option<&'static str>,
    days_from_today: i64,
    responsible: usize,
    notes: &'static str,
    product: usize,
    quantity: i64,
}

const OPERATIONS: &[DemoOperation] = &[
    DemoOperation {
        reference: "WH/IN/0001",
        op_type: OperationType::Receipt,
        status: OperationStatus::Ready,
        from: "Azure Interior",
        to: "WH/Stock1",
        contact: Some("Azure Interior"),
        days_from_today: 3,
        responsible: 0,
        notes: "Office furniture order",
        product: 0,
        quantity: 20,
    },
    DemoOperation {
        reference: "WH/OUT/0001",
        op_type: OperationType::Delivery,
        status: OperationStatus::Waiting,
        from: "WH/Stock1",
        to: "Customer ABC",
        contact: Some("Customer ABC"),
        days_from_today: 1,
        responsible: 1,
        notes: "Customer order #1234",
        product: 1,
        quantity: 5,
    },
    DemoOperation {
        reference: "WH/INT/0001",
        op_type: OperationType::InternalTransfer,
        status: OperationStatus::Draft,
        from: "WH/Stock1",
        to: "SF/Cold1",
        contact: None,
        days_from_today: 4,
        responsible: 0,
        notes: "Relocate to cold storage",
        product: 4,
        quantity: 3,
    },
    DemoOperation {
        reference: "WH/IN/0002",
        op_type: OperationType::Receipt,
        status: OperationStatus::Done,
        from: "TechSupply Co",
        to: "WH/Stock2",
        contact: Some("TechSupply Co"),
        days_from_today: -2,
        responsible: 0,
        notes: "Electronics shipment",
        product: 3,
        quantity: 15,
    },
    DemoOperation {
        reference: "WH/OUT/0002",
        op_type: OperationType::Delivery,
        status: OperationStatus::Ready,
        from: "WH/Stock2",
        to: "Office Solutions Ltd",
        contact: Some("Office Solutions Ltd"),
        days_from_today: 2,
        responsible: 1,
        notes: "Corporate order",
        product: 3,
        quantity: 8,
    },
    DemoOperation {
        reference: "WH/ADJ/0001",
        op_type: OperationType::Adjustment,
        status: OperationStatus::Done,
        from: "WH/Stock1",
        to: "WH/Stock1",
        contact: None,
        days_from_today: -1,
        responsible: 0,
        notes: "Damaged items adjustment",
        product: 1,
        quantity: -3,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./stockmaster.db");

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
                println!("StockMaster Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./stockmaster.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 StockMaster Seed Data Loader");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {}", db_path))?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Users
    let password_hash = hash_password(DEMO_PASSWORD).context("hashing demo password")?;
    let mut user_ids = Vec::with_capacity(USERS.len());
    for (name, email, role) in USERS {
        let user = db.users().create(name, email, &password_hash, *role).await?;
        user_ids.push(user.id);
    }
    println!("✓ {} users created", user_ids.len());

    // Warehouses & locations
    let main = db
        .warehouses()
        .create(&WarehouseInput {
            name: "Main Warehouse".into(),
            short_code: "WH".into(),
            address: Some("123 Industrial Blvd, Suite 100".into()),
        })
        .await?;
    let storage = db
        .warehouses()
        .create(&WarehouseInput {
            name: "Storage Facility".into(),
            short_code: "SF".into(),
            address: Some("456 Storage Lane, Building B".into()),
        })
        .await?;
    println!("✓ 2 warehouses created");

    let mut location_ids = Vec::new();
    for (name, code, warehouse_id) in [
        ("Stock Area 1", "Stock1", main.id),
        ("Stock Area 2", "Stock2", main.id),
        ("Cold Storage", "Cold1", storage.id),
    ] {
        let location = db
            .locations()
            .create(&LocationInput {
                name: name.into(),
                short_code: code.into(),
                warehouse_id,
            })
            .await?;
        location_ids.push(location.id);
    }
    println!("✓ {} locations created", location_ids.len());

    // Products
    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, sku, category, reorder_level, description) in PRODUCTS {
        let product = db
            .products()
            .create(&ProductInput {
                name: name.to_string(),
                sku: sku.to_string(),
                category: category.to_string(),
                unit_of_measure: "Unit".to_string(),
                reorder_level: *reorder_level,
                description: Some(description.to_string()),
            })
            .await?;
        product_ids.push(product.id);
    }
    println!("✓ {} products created", product_ids.len());

    // Stock: (product, warehouse, location, on hand, free, cost in cents)
    let cells = [
        (product_ids[0], main.id, location_ids[0], 45, 40, 15_000),
        (product_ids[1], main.id, location_ids[0], 12, 10, 3_500),
        (product_ids[3], main.id, location_ids[1], 28, 25, 32_000),
        (product_ids[4], storage.id, location_ids[2], 8, 5, 45_000),
    ];
    for (product_id, warehouse_id, location_id, on_hand, free_to_use, cents) in cells {
        db.stock()
            .upsert(&StockUpsert {
                product_id,
                warehouse_id,
                location_id,
                on_hand,
                free_to_use,
                cost_per_unit: Money::from_cents(cents),
            })
            .await?;
    }
    println!("✓ {} stock entries created", cells.len());

    // Operations
    let today = Utc::now().date_naive();
    for demo in OPERATIONS {
        let input = OperationInput {
            reference: Some(demo.reference.to_string()),
            status: Some(demo.status),
            from_location: Some(demo.from.to_string()),
            to_location: Some(demo.to.to_string()),
            contact: demo.contact.map(str::to_string),
            responsible_id: Some(user_ids[demo.responsible]),
            notes: Some(demo.notes.to_string()),
            ..OperationInput::new(demo.op_type, offset(today, demo.days_from_today))
        };
        let items = [NewOperationItem {
            product_id: product_ids[demo.product],
            quantity: demo.quantity,
        }];

        db.operations().create(&input, &items).await?;
    }
    println!("✓ {} operations created", OPERATIONS.len());

    db.close().await;

    println!();
    println!("✅ Seed complete!");
    println!();
    println!("Demo Account Credentials:");
    println!("  Email: {}", USERS[0].1);
    println!("  Password: {}", DEMO_PASSWORD);

    Ok(())
}

fn offset(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}
