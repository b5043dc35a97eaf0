//! Route command: show the routing decision without executing.

use crate::classify::{Classifier, RegexClassifier};
use crate::cli::{load_config, output, RouteArgs};
use crate::registry::Registry;
use crate::routing::{RoutePreferences, Scorer};

/// Handle `switchyard route`.
pub fn handle_route(args: &RouteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;

    let registry = Registry::from_specs(config.backends.iter().map(|b| b.to_spec()).collect())?;
    let classifier = RegexClassifier::with_default_patterns()?;
    let scorer = Scorer::new(
        config.routing.confidence_divisor,
        config.routing.default_backend.clone(),
    );

    let counts = classifier.classify(&args.task);
    let decision = scorer.score(
        &registry,
        &counts,
        &RoutePreferences {
            force_backend: args.backend.clone(),
            prefer_cost: args.prefer_cost,
            prefer_speed: args.prefer_speed,
            prefer_quality: args.prefer_quality,
        },
    );

    if args.json {
        println!("{}", output::format_decision_json(&decision));
    } else {
        println!("{}", output::format_decision_table(&decision));
    }

    Ok(())
}
