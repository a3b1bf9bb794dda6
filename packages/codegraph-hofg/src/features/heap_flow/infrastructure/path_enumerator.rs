//! Path enumerator
//!
//! Seeds one empty path per `Object` vertex and walks tail matches. At a
//! fan-out the first applicable edge extends the path in place and every
//! further edge extends a clone. Once the path count reaches the cutoff no
//! more clones are made; existing paths still run to completion along their
//! first applicable edge, and the result is marked partial.

use crate::features::heap_flow::domain::{FlowEdge, Hofg, Path, PathEnumeration};

#[derive(Debug, Clone, Copy)]
pub struct PathEnumerator {
    max_paths: usize,
}

impl PathEnumerator {
    pub fn new(max_paths: usize) -> Self {
        Self {
            max_paths: max_paths.max(1),
        }
    }

    pub fn enumerate(&self, graph: &Hofg) -> PathEnumeration {
        let out_edges = graph.out_edges();
        let edges = graph.edges();
        let mut partial = false;

        let mut pending: Vec<Path> = graph.objects().map(Path::new).collect();
        if pending.len() > self.max_paths {
            pending.truncate(self.max_paths);
            partial = true;
        }
        pending.reverse();

        let mut total = pending.len();
        let mut finished: Vec<Path> = Vec::with_capacity(total);

        while let Some(mut path) = pending.pop() {
            loop {
                let frontier = path.frontier().value;
                let candidates: Vec<&FlowEdge> = out_edges
                    .get(&frontier)
                    .into_iter()
                    .flatten()
                    .map(|&idx| &edges[idx])
                    .filter(|edge| path.can_extend(edge))
                    .collect();

                let Some((first, rest)) = candidates.split_first() else {
                    break;
                };

                for edge in rest {
                    if total >= self.max_paths {
                        partial = true;
                        break;
                    }
                    let mut fork = path.clone();
                    fork.extend((*edge).clone());
                    pending.push(fork);
                    total += 1;
                }

                path.extend((*first).clone());
            }
            finished.push(path);
        }

        if partial {
            tracing::warn!(
                "Path enumeration stopped at {} paths; results are partial",
                self.max_paths
            );
        }

        PathEnumeration {
            paths: finished,
            partial,
        }
    }
}
