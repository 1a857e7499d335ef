use phylodyn_sim::birth_death::ObservationKind;
use phylodyn_sim::simulation::{Configuration, DatasetSummary};
use std::path::Path;

pub fn print_configuration(config: &Configuration, output: &Path) {
    let execution = &config.execution;
    let priors = &config.priors;
    let sequences = &config.sequences;

    println!("\n📋 Run Configuration");
    println!("  • Output: {} [-o, --output]", output.display());
    println!("  • Replicates: {} [-n, --replicates]", execution.replicates);
    println!("  • Random Seed: {} [-s, --seed]", execution.seed);
    println!(
        "  • Dataset Names: {}0 .. {} [--prefix]",
        execution.prefix,
        execution.dataset_name(execution.replicates.saturating_sub(1))
    );

    println!("\n🎲 Priors");
    println!(
        "  • Origin: Uniform[{}, {}]",
        priors.origin_min, priors.origin_max
    );
    println!("  • mu: Exponential(mean {})", priors.death_mean);
    println!("  • lamb - mu: Exponential(mean {})", priors.net_birth_mean);
    println!("  • psi: Exponential(mean {})", priors.psi_mean);
    println!("  • omega: Exponential(mean {})", priors.omega_mean);
    println!(
        "  • r: Uniform[{}, {}]",
        priors.removal_min, priors.removal_max
    );
    println!("  • rho: Uniform[{}, {}]", priors.rho_min, priors.rho_max);
    println!("  • alpha: Exponential(mean {})", priors.clock_rate_mean);

    println!("\n🧬 Sequences");
    println!("  • Model: JC69, strict clock");
    println!("  • Length: {} bp [-L, --sequence-length]", sequences.length);
    println!("  • Alignment Taxa: {} [--selection]", sequences.selection);

    println!("\n🌳 Conditioning");
    println!("  • Max Attempts: {}", config.conditioning.max_attempts);
    println!("  • Max Live Lineages: {}", config.conditioning.max_lineages);
    println!();
}

pub fn print_parameters(named: &[(String, f64)]) {
    for (name, value) in named {
        println!("  • {name:<6} {value:.6}");
    }
}

pub fn print_dataset_summary(summary: &DatasetSummary) {
    let p = &summary.parameters;
    println!(
        "✓ {}: origin {:.3}, lamb {:.4}, mu {:.4}, rho {:.3}, psi {:.4}, r {:.3}, omega {:.4}, alpha {:.4}",
        summary.name, summary.origin, p.lamb, p.mu, p.rho, p.psi, p.r, p.omega, p.alpha
    );
    println!(
        "    leaves {} reconstructed / {} full, {} aligned, {} attempt(s)",
        summary.reconstructed_leaves, summary.full_leaves, summary.alignment_taxa, summary.attempts
    );
    print_observation_counts(&summary.observation_counts, "    ");
}

pub fn print_observation_counts(counts: &[usize; 6], indent: &str) {
    let parts: Vec<String> = ObservationKind::ALL
        .iter()
        .zip(counts)
        .map(|(kind, count)| format!("{} {count}", kind.name()))
        .collect();
    println!("{indent}{}", parts.join(", "));
}
