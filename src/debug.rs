use alloc::{collections::VecDeque, string::String};
use core::fmt;

use crate::{AvlTree, Node};

impl<K> AvlTree<K>
where
    K: fmt::Display,
{
    /// Writes the shape of the tree to `w` as a Graphviz digraph.
    ///
    /// Each level of the tree is laid out on its own rank. Nodes are labelled `key:height` and
    /// missing children are drawn as points.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root() {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item<'a, K> {
            Node(&'a Node<K>),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _rank_node in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = node.key();
                let height = node.height();
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{height}\"]; ")?;

                for child in [node.left(), node.right()] {
                    match child {
                        Some(child) => {
                            let child_key = child.key();

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn empty_graph() {
        let tree: AvlTree<u32> = AvlTree::new();
        let mut out = String::new();

        tree.dotgraph("empty", &mut out).unwrap();

        assert_eq!(out, "digraph \"graph-empty\" {}");
    }

    #[test]
    fn graph_of_three_nodes() {
        let tree: AvlTree<u32> = [2, 1, 3].into_iter().collect();
        let mut out = String::new();

        tree.dotgraph("t", &mut out).unwrap();

        let expected = concat!(
            "digraph \"graph-t\" {\n subgraph \"subgraph-t\" {",
            "{rank=same; \"grapht-2\" [label=\"2:2\"]; }\n",
            "{rank=same; \"grapht-1\" [label=\"1:1\"]; \"grapht-3\" [label=\"3:1\"]; }\n",
            "{rank=same; \"grapht-missing0\" [shape=point]; \"grapht-missing1\" [shape=point]; ",
            "\"grapht-missing2\" [shape=point]; \"grapht-missing3\" [shape=point]; }\n",
            "\"grapht-2\" -> \"grapht-1\";\n",
            "\"grapht-2\" -> \"grapht-3\";\n",
            "\"grapht-1\" -> \"grapht-missing0\";\n",
            "\"grapht-1\" -> \"grapht-missing1\";\n",
            "\"grapht-3\" -> \"grapht-missing2\";\n",
            "\"grapht-3\" -> \"grapht-missing3\";\n",
            " }\n}",
        );

        assert_eq!(out, expected);
    }
}
