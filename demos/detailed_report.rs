use rule_ast::{Record, build, evaluate_detailed};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rule = build(
        "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)",
    )
    .expect("failed to build rule")
    .expect("rule has no conditions");

    let record = Record::new()
        .set("age", 35_i64)
        .set("department", "Sales")
        .set("salary", 60000_i64);

    let report = evaluate_detailed(&rule, &record).expect("evaluation failed");

    println!("{report}");
    println!();
    for check in report.checks() {
        println!(
            "  {:<30} present: {:<5} matched: {}",
            check.condition(),
            check.field_present(),
            check.matched()
        );
    }
    println!("Missing fields in: {:?}", report.missing_fields());
    println!("Duration: {:?}", report.duration());
}
