use rule_ast::{Record, build};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text = "(age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')";
    let rule = build(text)
        .expect("failed to build rule")
        .expect("rule has no conditions");

    println!("Rule: {rule}");
    println!("Serialized: {}", rule.to_json());

    let people = [
        Record::new().set("age", 35_i64).set("department", "Sales"),
        Record::new().set("age", 22_i64).set("department", "Marketing"),
        Record::new().set("age", 22_i64).set("department", "Sales"),
        Record::new().set("department", "Sales"),
    ];

    for record in &people {
        let result = rule.evaluate(record).expect("evaluation failed");
        println!("{record:?} -> {result}");
    }
}
