//! Progress indicators for multi-file inspection
//!
//! Uses `linya` for allocation-free, concurrency-optimized progress bars drawn on
//! stderr, so they never mix with the report on stdout.

use linya::{Bar, Progress};
use std::sync::{Arc, Mutex};

/// One bar shared by every worker inspecting session files
#[derive(Clone)]
pub struct SessionProgress {
  progress: Arc<Mutex<Progress>>,
  bar: Arc<Bar>,
}

impl SessionProgress {
  /// Create a bar counting `total` files
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self {
      progress: Arc::new(Mutex::new(progress)),
      bar: Arc::new(bar),
    }
  }

  /// Increment by one finished file (thread-safe)
  pub fn inc(&self) {
    if let Ok(mut progress) = self.progress.lock() {
      progress.inc_and_draw(&self.bar, 1);
    }
  }
}
