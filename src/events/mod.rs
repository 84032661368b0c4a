//! # Events Module
//!
//! Progress notifications sent over a channel.
//!
//! The core never touches presentation state. Scanner, runner and batch
//! driver publish [`Event`]s; the receiving side decides which thread
//! renders them (the CLI drives its progress bar from a second thread).
//!
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Organize(OrganizeEvent::Progress(p)) = event {
//!             println!("{}/{} {}", p.processed, p.total, p.current_file);
//!         }
//!     }
//! });
//!
//! runner.run_with_events(&files, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
