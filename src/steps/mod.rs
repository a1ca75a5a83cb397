//! Shared-step expansion.
//!
//! MagicPod renders a test case's steps as line-oriented text in which a line
//! such as `Shared step: Login (email: a@b.com)` stands for the whole `Login`
//! shared step. This module turns such text into a self-contained block:
//!
//! - [`extract_reference_name`] recognises reference lines in any supported
//!   locale.
//! - [`NameCandidates`] and [`SharedStepTable::resolve`] map a possibly
//!   parameterised reference to the most specific registered group.
//! - [`expand`] and [`Expander`] inline each resolved group beneath its
//!   reference line, recursively.
//! - [`count_leaf_steps`] derives a step count from the expanded block.
//!
//! Everything here is pure and synchronous; the table is passed explicitly.

mod block;
mod candidates;
mod count;
mod error;
mod expand;
mod marker;
mod table;

pub use block::StepBlock;
pub use candidates::NameCandidates;
pub use count::count_leaf_steps;
pub use error::ExpandError;
pub use expand::{CyclePolicy, Expander, NESTED_INDENT, expand};
pub use marker::{extract_reference_name, is_reference, reference_markers};
pub use table::SharedStepTable;
