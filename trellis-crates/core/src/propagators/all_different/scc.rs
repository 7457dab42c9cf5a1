use crate::engine::DomainId;
use crate::propagation::Domains;
use crate::propagation::ReadDomains;

/// The successors of `node` in the graph where node `i` has an edge to node `v - 1` for every
/// value `v` in the domain of `successors[i]`.
pub(crate) fn successor_nodes(
    domains: Domains<'_>,
    successors: &[DomainId],
    node: usize,
) -> Vec<usize> {
    let num_nodes = successors.len();

    domains
        .domain(successors[node])
        .values()
        .filter_map(|value| usize::try_from(i64::from(value) - 1).ok())
        .take_while(|&next| next < num_nodes)
        .collect()
}

/// Computes the strongly connected components of the successor graph of a (sub)circuit with
/// Tarjan's algorithm.
///
/// The buffers are kept between calls; nothing in them survives a call.
#[derive(Clone, Debug, Default)]
pub(crate) struct StronglyConnectedComponents {
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
}

impl StronglyConnectedComponents {
    /// The components of the successor graph, each listing its nodes.
    pub(crate) fn compute(
        &mut self,
        domains: Domains<'_>,
        successors: &[DomainId],
    ) -> Vec<Vec<usize>> {
        let num_nodes = successors.len();
        self.index.clear();
        self.index.resize(num_nodes, None);
        self.lowlink.clear();
        self.lowlink.resize(num_nodes, 0);
        self.on_stack.clear();
        self.on_stack.resize(num_nodes, false);
        self.stack.clear();

        let mut components = Vec::new();
        let mut next_index = 0;

        for root in 0..num_nodes {
            if self.index[root].is_some() {
                continue;
            }

            // Frames of the depth-first search: a node, its successors and the next one to visit.
            let mut call_stack = vec![(root, successor_nodes(domains, successors, root), 0)];
            self.visit(root, &mut next_index);

            while let Some(frame) = call_stack.last_mut() {
                let node = frame.0;

                if frame.2 < frame.1.len() {
                    let next = frame.1[frame.2];
                    frame.2 += 1;

                    match self.index[next] {
                        None => {
                            self.visit(next, &mut next_index);
                            call_stack.push((next, successor_nodes(domains, successors, next), 0));
                        }
                        Some(visited) if self.on_stack[next] => {
                            self.lowlink[node] = self.lowlink[node].min(visited);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                let _ = call_stack.pop();
                if let Some(&(parent, _, _)) = call_stack.last() {
                    self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[node]);
                }

                if Some(self.lowlink[node]) == self.index[node] {
                    let mut component = Vec::new();
                    while let Some(member) = self.stack.pop() {
                        self.on_stack[member] = false;
                        component.push(member);
                        if member == node {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }

        components
    }

    fn visit(&mut self, node: usize, next_index: &mut usize) {
        self.index[node] = Some(*next_index);
        self.lowlink[node] = *next_index;
        *next_index += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn two_cycles_are_two_components() {
        let mut solver = TestSolver::default();
        // 0 -> 1 -> 0, 2 -> 3 -> 2 and an edge 1 -> 2 which does not close a cycle.
        let successors = vec![
            solver.new_variable(2, 2),
            solver.new_sparse_variable(vec![1, 3]),
            solver.new_variable(4, 4),
            solver.new_variable(3, 3),
        ];

        let mut components = StronglyConnectedComponents::default()
            .compute(solver.store.domains(), &successors)
            .into_iter()
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect::<Vec<_>>();
        components.sort();

        assert_eq!(components, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn a_single_cycle_is_one_component() {
        let mut solver = TestSolver::default();
        let successors = vec![
            solver.new_variable(2, 3),
            solver.new_variable(3, 3),
            solver.new_variable(1, 1),
        ];

        let components =
            StronglyConnectedComponents::default().compute(solver.store.domains(), &successors);

        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 3);
    }

    #[test]
    fn values_outside_the_graph_are_ignored() {
        let mut solver = TestSolver::default();
        let successors = vec![solver.new_variable(0, 5), solver.new_variable(1, 1)];

        assert_eq!(
            successor_nodes(solver.store.domains(), &successors, 0),
            vec![0, 1]
        );
    }
}
