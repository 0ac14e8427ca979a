use crate::commands::{
    block_on, load_config, CommandResult, EXIT_DATABASE, EXIT_STORE, EXIT_VERIFICATION,
};
use supplybot_db::{connect_with_settings, migrations, SampleDataset, SeedResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let result = block_on("seed", async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), EXIT_DATABASE))?;

        let outcome = async {
            migrations::run_pending(&pool)
                .await
                .map_err(|error| ("migration", error.to_string(), EXIT_STORE))?;

            let seed = SampleDataset::ensure_seeded(&pool)
                .await
                .map_err(|error| ("seed_execution", error.to_string(), EXIT_STORE))?;

            let verification = SampleDataset::verify(&pool)
                .await
                .map_err(|error| ("seed_verification", error.to_string(), EXIT_VERIFICATION))?;

            let missing = verification
                .checks
                .iter()
                .filter_map(|(product, present)| (!present).then_some(*product))
                .collect::<Vec<_>>();

            if seed.was_seeded() && !missing.is_empty() {
                return Err(("seed_verification", verification_message(&missing), EXIT_VERIFICATION));
            }
            Ok(seed_message(&seed, &missing))
        }
        .await;

        pool.close().await;
        outcome
    });

    match result {
        Ok(Ok(message)) => CommandResult::success("seed", message),
        Ok(Err((error_class, message, exit_code))) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
        Err(failure) => failure,
    }
}

fn seed_message(seed: &SeedResult, missing: &[&str]) -> String {
    let mut message = if seed.was_seeded() {
        format!("inserted {} sample rows ({} rows total)", seed.inserted, seed.total_rows)
    } else {
        format!("supply_chain already populated ({} rows), sample data left untouched", seed.total_rows)
    };
    if !missing.is_empty() {
        message.push_str(&format!("; sample products not present: {}", missing.join(", ")));
    }
    message
}

fn verification_message(missing: &[&str]) -> String {
    if missing.is_empty() {
        "some sample rows failed to load".to_string()
    } else {
        format!("seed verification failed for: {}", missing.join(", "))
    }
}
