//! Template compilation and execution.
//!
//! Templates are compiled through a [`Registry`], which resolves every name
//! against the elements and filters registered at that moment and caches
//! the result by source text. Executing a compiled [`Template`] against a
//! render snapshot is the first of two passes: adaptive elements are left as
//! placeholders and reported in [`Execution::pending`], and
//! [`resolve`](adaptive::resolve) fills them in once the static width of
//! the line is known.
//!
//! # Examples
//!
//! ```rust
//! use pbar::template::adaptive::resolve;
//! use pbar::{Registry, State};
//!
//! let registry = Registry::new();
//! let template = registry.compile(r#"{{counters . }} {{bar . "[" "=" ">" " " "]"}}"#).unwrap();
//!
//! let state = State::new(5, 10, 20);
//! let first_pass = template.execute(&state).unwrap();
//! assert_eq!(first_pass.pending.len(), 1);
//!
//! let line = resolve(first_pass.text, &first_pass.pending, &state).unwrap();
//! assert_eq!(line, "5 / 10 [=====>     ]");
//! ```

pub mod adaptive;
pub(crate) mod parse;
pub mod registry;

pub use adaptive::ADAPTIVE_PLACEHOLDER;
pub use registry::Registry;

use crate::bar::State;
use crate::element::{Element, Filter};
use crate::error::{Error, Result};
use parse::{Arg, Node};

use std::fmt;
use std::sync::Arc;

/// What a pipeline stage name resolved to at compile time.
#[derive(Clone)]
pub(crate) enum Callee {
    Element(Arc<dyn Element>),
    Filter(Arc<Filter>),
}

struct BoundCommand {
    callee: Callee,
    args: Vec<String>,
}

enum BoundNode {
    Text(String),
    Action(Vec<BoundCommand>),
}

/// A parsed template with its names bound to elements and filters.
pub struct Template {
    source: String,
    nodes: Vec<BoundNode>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .finish()
    }
}

/// An adaptive element waiting for its share of the line.
#[derive(Clone)]
pub struct Pending {
    element: Arc<dyn Element>,
    args: Vec<String>,
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("args", &self.args).finish()
    }
}

impl Pending {
    /// Render the element with the final width carried by `state`.
    pub fn render(&self, state: &State) -> Result<String> {
        self.element.render(state, &self.args)
    }
}

/// Result of the first rendering pass.
#[derive(Debug)]
pub struct Execution {
    /// Rendered text, with one [`ADAPTIVE_PLACEHOLDER`] per pending element.
    pub text: String,
    /// Adaptive elements in the order they appeared in the template.
    pub pending: Vec<Pending>,
}

fn bind_command(command: parse::Command, callee: Callee) -> Result<BoundCommand> {
    let dots = command.args.iter().filter(|a| **a == Arg::Dot).count();
    match &callee {
        Callee::Element(_) if dots != 1 || command.args.first() != Some(&Arg::Dot) => {
            return Err(Error::configuration(
                command.offset,
                format!("element {:?} takes . as its first argument", command.name),
            ))
        }
        Callee::Filter(_) if dots > 0 => {
            return Err(Error::configuration(
                command.offset,
                format!("{:?} is not an element and cannot take .", command.name),
            ))
        }
        _ => {}
    }
    let args = command
        .args
        .into_iter()
        .filter_map(|arg| match arg {
            Arg::Str(s) => Some(s),
            Arg::Dot => None,
        })
        .collect();
    Ok(BoundCommand { callee, args })
}

impl Template {
    /// Bind parsed nodes using `lookup` to resolve names.
    pub(crate) fn bind<F>(source: &str, nodes: Vec<Node>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<Callee>,
    {
        let mut bound = Vec::with_capacity(nodes.len());
        for node in nodes {
            bound.push(match node {
                Node::Text(text) => BoundNode::Text(text),
                Node::Action(commands) => {
                    let mut pipeline = Vec::with_capacity(commands.len());
                    for command in commands {
                        let callee = lookup(&command.name).ok_or_else(|| {
                            Error::configuration(
                                command.offset,
                                format!("function {:?} not defined", command.name),
                            )
                        })?;
                        pipeline.push(bind_command(command, callee)?);
                    }
                    BoundNode::Action(pipeline)
                }
            });
        }
        Ok(Self {
            source: source.to_string(),
            nodes: bound,
        })
    }

    /// The text this template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run the first rendering pass.
    ///
    /// Each pipeline stage receives the previous stage's output as its last
    /// argument. Adaptive elements are not rendered: they produce an
    /// [`ADAPTIVE_PLACEHOLDER`] and are returned in
    /// [`Execution::pending`].
    pub fn execute(&self, state: &State) -> Result<Execution> {
        let mut text = String::new();
        let mut pending = Vec::new();
        for node in &self.nodes {
            let pipeline = match node {
                BoundNode::Text(literal) => {
                    text.push_str(literal);
                    continue;
                }
                BoundNode::Action(pipeline) => pipeline,
            };
            let mut piped: Option<String> = None;
            for command in pipeline {
                let mut args = command.args.clone();
                args.extend(piped.take());
                let output = match &command.callee {
                    Callee::Element(element) if element.is_adaptive() => {
                        pending.push(Pending {
                            element: Arc::clone(element),
                            args,
                        });
                        ADAPTIVE_PLACEHOLDER.to_string()
                    }
                    Callee::Element(element) => element.render(state, &args)?,
                    Callee::Filter(filter) => filter(&args),
                };
                piped = Some(output);
            }
            text.push_str(&piped.unwrap_or_default());
        }
        Ok(Execution { text, pending })
    }
}
