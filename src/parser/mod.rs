//! Parser for the compact constraint text format
//!
//! Values are `<number>mm`, `<integer>px`, `<number>%`, `auto` or a bare
//! integer (pixels). A string holds 1-4 space separated values, or labeled
//! `side:value` entries separated by `;`. Anchor indices and anchor positions
//! use the same shapes with integers and reals as values.

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{parse_anchor_indices, parse_anchor_positions, parse_inset, parse_insets};
