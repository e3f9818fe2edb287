/// Catalog Linter — validates a variant catalog before deployment.
///
/// Usage: catalog_linter <catalog.json> [catalog.json ...]

use std::process;
use variant_engine::schema::catalog::VariantCatalog;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog.json> [catalog.json ...]");
        process::exit(0);
    }

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for path in &args[1..] {
        let catalog = match VariantCatalog::load_from_json(std::path::Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to load '{}': {}", path, e);
                total_errors += 1;
                continue;
            }
        };

        println!(
            "Loaded '{}': {} variants, weight tables for {} levels",
            path,
            catalog.variants.len(),
            catalog.default_weights.len()
        );

        let (errors, warnings) = lint_catalog(&catalog);

        for warning in &warnings {
            println!("WARNING: {}: {}", path, warning);
        }
        for error in &errors {
            println!("ERROR: {}: {}", path, error);
        }

        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        total_errors, total_warnings
    );

    if total_errors == 0 {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_catalog(catalog: &VariantCatalog) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !catalog.enabled {
        warnings.push("catalog is disabled; decoration will be skipped".to_string());
    }

    if catalog.variants.is_empty() {
        errors.push("catalog declares no variants".to_string());
    }

    if catalog.inject_target.is_empty() {
        errors.push("inject_target is empty".to_string());
    }

    for (key, variant) in &catalog.variants {
        if variant.block.trim().is_empty() {
            warnings.push(format!("variant '{}' has an empty block", key));
        }
        if key.contains('|') {
            errors.push(format!(
                "variant key '{}' contains the seed delimiter '|'",
                key
            ));
        }
    }

    for (level, table) in &catalog.default_weights {
        if table.is_empty() {
            warnings.push(format!("level '{}' has an empty weight table", level));
            continue;
        }

        let mut usable = 0;
        for (key, weight) in table {
            if !catalog.variants.contains_key(key) {
                errors.push(format!(
                    "level '{}' weighs '{}' which is not a declared variant",
                    level, key
                ));
            }
            if !weight.is_finite() || *weight <= 0.0 {
                warnings.push(format!(
                    "level '{}' weight for '{}' is {} (ignored at runtime)",
                    level, key, weight
                ));
            } else {
                usable += 1;
            }
        }

        if usable == 0 {
            errors.push(format!(
                "level '{}' has no usable weight; decoration will be skipped",
                level
            ));
        }

        // Variants the table never mentions can still be reached via the
        // fallback path, so flag them for review rather than erroring.
        for key in catalog.variants.keys() {
            if !table.contains_key(key) {
                warnings.push(format!(
                    "level '{}' never weighs variant '{}'",
                    level, key
                ));
            }
        }
    }

    (errors, warnings)
}
