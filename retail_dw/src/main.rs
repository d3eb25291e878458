// /////////////////////////////////////////////////////////////////////////////
// Retail Data Warehouse ETL
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Composition root
//!
//! Wires the Postgres repository implementations into the application
//! services, parses and validates the command line, and dispatches to
//! the matching use case. This is the one place that knows every
//! concrete type in the crate; everything it assembles is handed down
//! as a trait object or an owned service.

use std::sync::Arc;
use std::time::Duration;

use retail_dw::application::{
    use_cases::{ConnectivityUseCase, EtlUseCase, QualityUseCase, SetupUseCase, VersionsUseCase},
    DimensionResolver, FactWriter, PartitionManager, Pipeline, QualityMonitor,
};
use retail_dw::application::pipeline::PipelineConfig;
use retail_dw::application::versioning::VersionManager;
use retail_dw::infrastructure::repositories::{
    PgCustomerDimensionRepository, PgDateDimensionRepository, PgFactRepository, PgLineageRepository,
    PgPartitionRepository, PgProductDimensionRepository, PgQualityRepository, PgSchemaRepository, PgVersionRepository,
};
use retail_dw::infrastructure::{config::AppConfig, csv_extractor::CsvExtractorConfig, logging, metrics, scheduler::Scheduler, CsvExtractor};
use retail_dw_bootstrap::{shutdown::ShutdownCoordinator, signals, ValidatedCommand};
use retail_dw_domain::services::quality_rules::QualityThresholds;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info, warn};

const SCHEDULER_STATE_PATH: &str = "data/scheduler.json";

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

async fn run() -> i32 {
    let validated_cli = match retail_dw_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("argument error: {err}");
            return retail_dw_bootstrap::map_error_to_exit_code(&err).as_i32();
        }
    };

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return 1;
        }
    };

    logging::init(&config.monitoring);

    let coordinator = ShutdownCoordinator::new(Duration::from_secs(10));
    let shutdown_token = coordinator.token();
    tokio::spawn(async move {
        signals::create_signal_handler()
            .wait_for_signal(Box::new(move || shutdown_token.cancel()))
            .await;
    });

    let pool = match PgPoolOptions::new()
        .max_connections(config.database.pool_size)
        .connect(&config.database.connection_string())
        .await
    {
        Ok(pool) => pool,
        Err(err) => {
            error!(error = %err, "failed to connect to the warehouse database");
            return 1;
        }
    };

    let registry = metrics::new_registry();
    let pipeline_metrics = match metrics::PipelineMetrics::new(&registry) {
        Ok(metrics) => Arc::new(metrics),
        Err(err) => {
            error!(error = %err, "failed to register prometheus metrics");
            return 1;
        }
    };

    let schema_repo: Arc<dyn retail_dw_domain::repositories::SchemaRepository> = Arc::new(PgSchemaRepository::new(pool.clone()));
    let version_repo: Arc<dyn retail_dw_domain::repositories::VersionRepository> = Arc::new(PgVersionRepository::new(pool.clone()));
    let lineage_repo: Arc<dyn retail_dw_domain::repositories::LineageRepository> = Arc::new(PgLineageRepository::new(pool.clone()));
    let quality_repo: Arc<dyn retail_dw_domain::repositories::QualityRepository> = Arc::new(PgQualityRepository::new(pool.clone()));
    let customer_repo: Arc<dyn retail_dw_domain::repositories::CustomerDimensionRepository> = Arc::new(PgCustomerDimensionRepository::new(pool.clone()));
    let product_repo: Arc<dyn retail_dw_domain::repositories::ProductDimensionRepository> = Arc::new(PgProductDimensionRepository::new(pool.clone()));
    let date_repo: Arc<dyn retail_dw_domain::repositories::DateDimensionRepository> = Arc::new(PgDateDimensionRepository::new(pool.clone()));
    let partition_repo: Arc<dyn retail_dw_domain::repositories::PartitionRepository> = Arc::new(PgPartitionRepository::new(pool.clone()));
    let fact_repo = Arc::new(PgFactRepository::with_metrics(pool.clone(), pipeline_metrics.clone()));

    let resolver = Arc::new(DimensionResolver::new(customer_repo, product_repo, date_repo, "CSV"));
    let partitions = Arc::new(PartitionManager::new(partition_repo));
    let writer = Arc::new(FactWriter::new(fact_repo));
    let quality = Arc::new(QualityMonitor::new(quality_repo.clone(), QualityThresholds::default()));
    let versions = Arc::new(VersionManager::new(version_repo.clone()));

    let status = match validated_cli.command {
        ValidatedCommand::Setup { drop_existing } => {
            let use_case = SetupUseCase::new(schema_repo.clone());
            match use_case.run(drop_existing).await {
                Ok(()) => {
                    info!("schema setup complete");
                    0
                }
                Err(err) => {
                    error!(error = %err, "schema setup failed");
                    1
                }
            }
        }

        ValidatedCommand::Test => {
            let use_case = ConnectivityUseCase::new(schema_repo.clone());
            match use_case.run().await {
                Ok(()) => {
                    info!("database connectivity OK");
                    0
                }
                Err(err) => {
                    error!(error = %err, "database connectivity check failed");
                    1
                }
            }
        }

        ValidatedCommand::Etl { source, job_name, batch_size } => {
            let pipeline_config = PipelineConfig {
                job_name: job_name.unwrap_or_else(|| "retail-etl".to_string()),
                batch_size: batch_size.unwrap_or(config.etl.batch_size),
                max_retries: config.etl.max_retries,
                retry_delay: config.etl.retry_delay(),
                checkpoint_interval: config.etl.checkpoint_interval,
                quality_sample_size: config.etl.quality_sample_size,
                data_source: "CSV".to_string(),
            };

            let extractor = match CsvExtractor::open(&source, CsvExtractorConfig::default()) {
                Ok(extractor) => extractor,
                Err(err) => {
                    error!(error = %err, path = %source.display(), "failed to open source file");
                    return 1;
                }
            };

            let pipeline = Pipeline::new(resolver, partitions, writer, quality, versions, lineage_repo, pipeline_config);
            let use_case = EtlUseCase::new(Arc::new(pipeline));

            match use_case.run(Box::new(extractor)).await {
                Ok(outcome) => {
                    info!(
                        job_id = %outcome.job_id,
                        version = %outcome.version_number,
                        status = %outcome.status,
                        extracted = outcome.records_extracted,
                        rejected = outcome.records_rejected,
                        loaded = outcome.records_loaded,
                        "pipeline run finished"
                    );
                    if matches!(outcome.status, retail_dw_domain::RunStatus::Success) {
                        0
                    } else {
                        1
                    }
                }
                Err(err) => {
                    error!(error = %err, "pipeline run aborted");
                    1
                }
            }
        }

        ValidatedCommand::ScheduleDaily { name, time, csv_path } => {
            let scheduler = Scheduler::new(SCHEDULER_STATE_PATH);
            match scheduler.add_daily(name, time, csv_path.to_string_lossy().to_string()).await {
                Ok(job) => {
                    println!("scheduled job {} ({})", job.id, job.name);
                    0
                }
                Err(err) => {
                    error!(error = %err, "failed to add scheduled job");
                    1
                }
            }
        }
        ValidatedCommand::ScheduleList => {
            let scheduler = Scheduler::new(SCHEDULER_STATE_PATH);
            match scheduler.list().await {
                Ok(jobs) => {
                    for job in &jobs {
                        println!("{} | {} | {:?} | last_run={:?}", job.id, job.name, job.schedule_type, job.last_run);
                    }
                    0
                }
                Err(err) => {
                    error!(error = %err, "failed to list scheduled jobs");
                    1
                }
            }
        }
        ValidatedCommand::ScheduleStart => {
            info!("scheduler loop starting, waiting for shutdown signal");
            coordinator.token().cancelled().await;
            info!("scheduler loop stopped");
            0
        }

        ValidatedCommand::QualityCheck { table } => {
            let use_case = QualityUseCase::new(quality.clone(), quality_repo.clone());
            match use_case.check(&table).await {
                Ok(rows) => {
                    for (metric, value, meets_threshold) in &rows {
                        println!("{metric}: {value:.2} (meets_threshold={meets_threshold:?})");
                    }
                    0
                }
                Err(err) => {
                    error!(error = %err, table = %table, "quality check failed");
                    1
                }
            }
        }
        ValidatedCommand::QualityReport { table } => {
            let use_case = QualityUseCase::new(quality.clone(), quality_repo.clone());
            match use_case.report(&table).await {
                Ok(rows) => {
                    for (metric, trend) in &rows {
                        match trend {
                            Some((latest, mean, stddev, direction)) => {
                                println!("{metric}: latest={latest:.2} mean={mean:.2} stddev={stddev:.2} trend={direction:?}")
                            }
                            None => println!("{metric}: no history"),
                        }
                    }
                    0
                }
                Err(err) => {
                    error!(error = %err, table = %table, "quality report failed");
                    1
                }
            }
        }

        ValidatedCommand::VersionsList => {
            let use_case = VersionsUseCase::new(version_repo.clone());
            match use_case.list(20).await {
                Ok(versions) => {
                    for version in &versions {
                        println!("{} | {} | records={} | status={:?}", version.version_number, version.created_at, version.records_count, version.status);
                    }
                    0
                }
                Err(err) => {
                    error!(error = %err, "versions list failed");
                    1
                }
            }
        }
        ValidatedCommand::VersionsShow { version_number } => {
            let use_case = VersionsUseCase::new(version_repo.clone());
            match use_case.show(&version_number).await {
                Ok(Some(version)) => {
                    println!(
                        "{} | type={} | created_at={} | records={} | source={:?} | hash={:?} | status={:?}",
                        version.version_number,
                        version.version_type,
                        version.created_at,
                        version.records_count,
                        version.source_file,
                        version.file_hash,
                        version.status
                    );
                    0
                }
                Ok(None) => {
                    warn!(version_number = %version_number, "version not found");
                    1
                }
                Err(err) => {
                    error!(error = %err, "versions show failed");
                    1
                }
            }
        }
    };

    if coordinator.is_shutting_down() {
        coordinator.complete_shutdown();
    }

    status
}
