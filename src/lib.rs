// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Layout math casts freely between slot indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Gesture/layout math frequently compares against exact 0.0 / 1.0
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]

//! Gesture-driven carousel window switcher engine.
//!
//! Swipedeck implements the full interaction model of a touch-first
//! window switcher: a horizontally scrolling carousel of scaled-down
//! windows that is panned by dragging, flicked with momentum, swiped
//! vertically to close or minimize, and committed by tapping. The
//! engine is compositor-agnostic: the host delivers input events and
//! item-set changes, renders with the transforms the engine computes,
//! and executes window operations through the [`session::Shell`] trait.
//!
//! # Key entry points
//!
//! - [`session::SessionController`] - one per output; owns the whole
//!   session lifecycle
//! - [`session::Shell`] - the host-side callback surface
//! - [`options::Options`] - runtime configuration (TOML presets)
//! - [`layout::layout_slots`] - the pure carousel layout function
//!
//! # Architecture
//!
//! Input flows through the [`gesture::GestureTracker`] state machine,
//! which classifies press/move/release sessions into high-level
//! intents. The controller applies intents to a continuous selection
//! offset, recomputes slot targets with the layout engine, and
//! reconciles each item's committed transform through the
//! [`animation`] driver: snapped while input or momentum is live,
//! eased on commit. Flick releases hand a terminal velocity to the
//! [`momentum`] integrator, which the post-frame hook decays until the
//! selection settles on a slot.

pub mod animation;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod item;
pub mod layout;
pub mod momentum;
pub mod options;
pub mod session;
