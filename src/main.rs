// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use Commands::Create;
use Commands::List;
use anyhow::Result;
use archiplex::cancel::CancellationToken;
use archiplex::cli::Cli;
use archiplex::cli::Commands;
use archiplex::config::ExperimentRequest;
use archiplex::generator::create_experiment;
use archiplex::list::list_experiments;
use archiplex::logging::setup_tracing;
use archiplex::paths::Layout;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
  let _log_guard = setup_tracing()?;

  let cancel = CancellationToken::new();
  let listener = cancel.cancel_on_interrupt()?;

  let Cli { command } = Cli::parse();
  let main_span = tracing::info_span!("archiplex");
  let _enter = main_span.enter();

  match command {
    Create(create_args) => {
      let json = create_args.json;
      let request = ExperimentRequest::try_from(create_args)?;

      let result = create_experiment(&request, &cancel);

      match result {
        Ok(report) => {
          if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
          }
        }
        Err(e) if e.is_cancelled() => {
          eprintln!("Experiment creation cancelled.");
        }
        Err(e) => return Err(e.into()),
      }
    }
    List(list_args) => {
      let root = list_args
        .experiments_dir
        .unwrap_or_else(|| Layout::current().experiments_root);

      tracing::info!("Experiments in {}:", root.display());
      for name in list_experiments(&root)? {
        println!("{}", name);
      }
    }
  }

  listener.abort();
  Ok(())
}
