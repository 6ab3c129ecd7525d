use clue_linker::{
    logging, ClueError, ClueSession, DriverConfig, InMemoryTaxonomy, Taxonomy, TracingObserver,
};

fn main() {
    let _ = dotenvy::dotenv();
    let config = DriverConfig::from_env();
    logging::init_tracing(&config.log_level);

    if let Err(err) = run(&config) {
        tracing::error!(error = %err, "clue generation failed");
        std::process::exit(1);
    }
}

fn run(config: &DriverConfig) -> Result<(), ClueError> {
    config.linker.validate()?;

    let taxonomy = InMemoryTaxonomy::load(&config.taxonomy_path)?;
    tracing::info!(
        taxonomy = taxonomy.name(),
        concepts = taxonomy.len(),
        path = %config.taxonomy_path.display(),
        "taxonomy loaded"
    );

    let observer = TracingObserver;
    let mut session = ClueSession::new(&taxonomy, &observer);
    for (words, category) in [
        (&config.link_words, "link"),
        (&config.avoid_words, "avoid"),
        (&config.neutral_words, "neutral"),
        (&config.assassin_words, "assassin"),
    ] {
        if !words.trim().is_empty() {
            session.update_words(words, category, "add")?;
        }
    }

    let added = session.link(&config.linker)?;
    tracing::info!(records = added, "linking finished");
    session.recommend(config.linker.min_similarity)?;

    println!("{}", session.render_records());
    println!("{}", session.render_recommendations());
    Ok(())
}
