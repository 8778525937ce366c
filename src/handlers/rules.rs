use crate::error::Result;
use crate::validation::MetricsRegistry;

/// Print every registered rule with the kinds it applies to.
pub fn handle_rules() -> Result<()> {
    let registry = super::build_registry(&MetricsRegistry::new());

    for rule in registry.rules() {
        let kinds: Vec<&str> = rule.applies_to().iter().map(|k| k.as_str()).collect();
        println!("{}", rule.name());
        println!("  kinds:       {}", kinds.join(", "));
        println!("  description: {}", rule.description());
    }

    Ok(())
}
