//! Graphviz output for compiled decision trees.
//!
//! Inner nodes are labelled with the index of the column they test (0 when
//! no swap is needed), leaves with the body of their action. Edges carry
//! the matched head constructor, `d` for the default branch and `f` for a
//! branch that fails.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use ast::{DecTree, Term};
use printer::Print;

pub fn to_dot(path: impl AsRef<Path>, tree: &DecTree) -> io::Result<()> {
    let mut file = File::create(path)?;
    write_dot(&mut file, tree)
}

pub fn write_dot<W: Write>(out: &mut W, tree: &DecTree) -> io::Result<()> {
    writeln!(out, "digraph matching {{")?;
    writeln!(out, "    node [shape=box];")?;
    let mut next_id = 0;
    emit(out, tree, &mut next_id)?;
    writeln!(out, "}}")
}

fn emit<W: Write>(out: &mut W, tree: &DecTree, next_id: &mut usize) -> io::Result<usize> {
    let id = *next_id;
    *next_id += 1;
    match tree {
        DecTree::Leaf(action) => {
            let label = escape(&action.body.print_to_string(None));
            writeln!(out, "    n{id} [label=\"{label}\"];")?;
        }
        DecTree::Fail => {
            writeln!(out, "    n{id} [label=\"✗\" shape=circle];")?;
        }
        DecTree::Node(node) => {
            let column = node.swap.unwrap_or(0);
            writeln!(out, "    n{id} [label=\"@{column}\" shape=circle];")?;
            for (tag, child) in &node.children {
                let child_id = emit(out, child, next_id)?;
                let label = edge_label(tag.as_ref(), child);
                writeln!(out, "    n{id} -> n{child_id} [label=\"{label}\"];")?;
            }
        }
    }
    Ok(id)
}

fn edge_label(tag: Option<&Term>, child: &DecTree) -> String {
    if child.is_fail() {
        return "f".to_owned();
    }
    match tag {
        Some(term) => escape(&term.print_to_string(None)),
        None => "d".to_owned(),
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{DecNode, RhsBinder, Sort};

    fn sample_tree() -> DecTree {
        DecTree::Node(DecNode {
            swap: Some(1),
            children: vec![
                (Some(Sort::typ().into()), DecTree::Leaf(RhsBinder::closed(Sort::typ().into()))),
                (None, DecTree::Fail),
            ],
        })
    }

    #[test]
    fn writes_well_formed_dot() {
        let mut buf = Vec::new();
        write_dot(&mut buf, &sample_tree()).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("digraph matching {"));
        assert!(out.trim_end().ends_with('}'));
        // The tested column, the matched constructor, and the fail edge.
        assert!(out.contains("@1"));
        assert!(out.contains("TYPE"));
        assert!(out.contains("label=\"f\""));
    }

    #[test]
    fn to_dot_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.dot");
        to_dot(&path, &sample_tree()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("digraph"));
    }
}
