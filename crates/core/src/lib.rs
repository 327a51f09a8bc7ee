//! # evogames
//!
//! Presentation side of the social-dilemma simulation demo: configuration
//! form, playback over precomputed rounds, and the chart/table/insight
//! descriptions renderers draw.
//!
//! The simulation itself runs elsewhere. This crate only holds its results,
//! replays them round by round and describes what to show.
//!
//! ## Quick Start
//!
//! ```
//! use evogames::prelude::*;
//!
//! let config = SimulationConfig::with_defaults(DilemmaKind::TragedyCommons, "demo");
//! let results = Results::from_json(r#"{"rounds": [{}, {}], "scores": {}}"#).unwrap();
//!
//! let mut session = Session::new(ManualScheduler::new(), RecordingRenderer::default());
//! session.load(results, config);
//! session.play();
//! session.tick();
//!
//! let frame = session.renderer().last().unwrap();
//! assert_eq!(frame.progress.current, 1);
//! ```
//!
//! ## Modules
//!
//! - [`model`]: configuration and results payloads
//! - [`prefix`]: partial views over the first `k` rounds
//! - [`playback`]: the playback state machine and its timer seam
//! - [`session`]: controller + renderer lifecycle
//! - [`present`]: chart, table and insight adapters
//! - [`form`]: configuration form validation and collection
//! - [`notice`]: user-facing notifications

#[path = "core/model.rs"]
pub mod model;

#[path = "core/prefix.rs"]
pub mod prefix;

#[path = "core/playback.rs"]
pub mod playback;

#[path = "core/session.rs"]
pub mod session;

#[path = "core/form.rs"]
pub mod form;

#[path = "core/notice.rs"]
pub mod notice;

#[path = "core/fmt.rs"]
pub mod fmt;

pub mod present;

/// Prelude module for convenient imports.
///
/// ```
/// use evogames::prelude::*;
/// ```
pub mod prelude {
    pub use crate::form::{FormError, FormState};
    pub use crate::model::{
        DilemmaKind, DilemmaParameters, ModelError, Results, SimulationConfig,
        StrategyPerformance,
    };
    pub use crate::notice::{Level, Notice};
    pub use crate::playback::{ManualScheduler, PlaybackController, PlaybackState, Scheduler};
    pub use crate::prefix::ResultsView;
    pub use crate::present::{frame, Frame};
    pub use crate::session::{RecordingRenderer, Renderer, Session};
}
