//! Tariff finder entry point: CLI wiring, catalog loading, report output.

mod cli;

use std::fmt::Display;
use std::io;
use std::process;

use clap::Parser;

use tariff_finder::catalog::Catalog;
use tariff_finder::collaborators::{ComparisonService, TemplateExplainer};
use tariff_finder::io::export::{export_catalog_csv, write_results_csv};
use tariff_finder::logging;

use crate::cli::{Args, OutputFormat};

fn fail(message: impl Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn load_catalog(args: &Args) -> Catalog {
    let loaded = match &args.catalog {
        Some(path) => Catalog::from_toml_file(path),
        None => Catalog::builtin(),
    };
    loaded.unwrap_or_else(|e| fail(e))
}

#[cfg(feature = "api")]
fn serve(catalog: Catalog, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(tariff_finder::api::AppState { catalog });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
    if let Err(e) = rt.block_on(tariff_finder::api::serve(state, addr)) {
        fail(format!("server error: {e}"));
    }
}

#[cfg(not(feature = "api"))]
fn serve(_catalog: Catalog, _port: u16) {
    fail("--serve requires building with the `api` feature");
}

fn main() {
    let args = Args::parse();
    logging::init(logging::DEFAULT_LEVEL);

    let catalog = load_catalog(&args);

    if let Some(path) = &args.export_catalog {
        if let Err(e) = export_catalog_csv(catalog.tariffs(), path) {
            fail(format!("failed to write CSV: {e}"));
        }
        tracing::info!(path = %path.display(), tariffs = catalog.len(), "catalog exported");
        return;
    }

    if args.serve {
        serve(catalog, args.port);
        return;
    }

    let request = args.request_config().unwrap_or_else(|e| fail(e));
    let errors = request.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let explainer = TemplateExplainer;
    let mut service = ComparisonService::new(&catalog).with_policy(request.selection);
    if !args.no_explain {
        service = service.with_explainer(&explainer);
    }
    let comparison = service
        .compare(request.consumption)
        .unwrap_or_else(|e| fail(e));

    match args.format {
        OutputFormat::Text => println!("{comparison}"),
        OutputFormat::Json => match serde_json::to_string_pretty(&comparison) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(format!("failed to encode JSON: {e}")),
        },
        OutputFormat::Csv => {
            let stdout = io::stdout();
            if let Err(e) = write_results_csv(comparison.recommendations.as_slice(), stdout.lock())
            {
                fail(format!("failed to write CSV: {e}"));
            }
        }
    }
}
