use rule_ast::{Record, RuleCatalog};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut catalog = RuleCatalog::new();
    catalog
        .create_rule(
            "sales_or_marketing",
            "(age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')",
        )
        .expect("failed to create rule");
    catalog
        .create_rule("well_paid", "salary > 50000 OR experience > 5")
        .expect("failed to create rule");
    let target = catalog
        .combine_named("target", &["sales_or_marketing", "well_paid"])
        .expect("failed to combine rules");

    for rule in catalog.rules() {
        println!("{rule}");
    }

    let record = Record::from_json(&serde_json::json!({
        "age": 35,
        "department": "Sales",
        "salary": 60000,
        "experience": 3,
    }))
    .expect("invalid record");

    let result = catalog
        .evaluate_rule(target, &record)
        .expect("evaluation failed");
    println!("target -> {result}");
}
