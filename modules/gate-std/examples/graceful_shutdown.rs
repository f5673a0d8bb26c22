use std::thread;
use std::time::Duration;

use nexus_gate_std_rs::prelude::*;
use nexus_gate_std_rs::options_from_env;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct Worker {
  gate: Gate,
}

impl Worker {
  fn new(options: Vec<GateConfigOption>) -> Self {
    Self {
      gate: Gate::from_options(options),
    }
  }

  fn handle_task(&self, name: String) -> Result<(), String> {
    let Some(job) = self.gate.try_enter() else {
      return Err(format!("worker is stopping, task '{}' rejected", name));
    };
    thread::sleep(Duration::from_millis(200));
    tracing::info!(task = %name, "task done");
    job.complete();
    Ok(())
  }

  fn stop(&self) {
    self.gate.finish();
    self.gate.wait();
  }
}

fn main() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .try_init();

  let mut options = vec![GateConfigOption::with_name("demo-worker")];
  match options_from_env() {
    Ok(from_env) => options.extend(from_env),
    Err(err) => tracing::warn!(error = %err, "ignoring gate configuration from environment"),
  }
  let worker = Worker::new(options);

  let handles = (0..5)
    .map(|i| {
      let worker = worker.clone();
      thread::spawn(move || worker.handle_task(format!("/task/{}", i)))
    })
    .collect::<Vec<_>>();

  thread::sleep(Duration::from_millis(50));
  worker.stop();
  tracing::info!("worker stopped, all accepted tasks finished");

  if let Err(err) = worker.handle_task("/late".to_string()) {
    tracing::info!(%err, "late task");
  }
  for handle in handles {
    if let Ok(Err(err)) = handle.join() {
      tracing::info!(%err, "task");
    }
  }
}
