use crate::error::ChmError;
use crate::graph::Graph;

/// Peels the hypergraph: repeatedly removes the sole incident edge of any
/// degree-1 vertex until either no edge is left (acyclic, success) or no
/// degree-1 vertex exists (non-empty core, retryable failure).
///
/// The removal order is written into a fixed array from the *end*, so index 0
/// holds the last-peeled edge and a forward scan of the result visits edges
/// in reverse peeling chronology — exactly what value assignment needs.
///
/// Uses an explicit work-queue of vertex ids seeded with every initially
/// degree-1 vertex; removing an edge enqueues any endpoint that drops to
/// degree 1. A vertex's accumulator *is* the incident edge id whenever its
/// degree is 1, so no adjacency lists are needed.
pub(crate) fn peel(graph: &mut Graph) -> Result<Vec<u32>, ChmError> {
    let n = graph.edges.len();
    let mut order = vec![0u32; n];
    let mut remaining = n;

    let mut queue: Vec<u32> = Vec::with_capacity(n);
    for (vid, vert) in graph.vertices.iter().enumerate() {
        if vert.degree == 1 {
            queue.push(vid as u32);
        }
    }

    let mut head = 0usize;
    while head < queue.len() {
        let vid = queue[head] as usize;
        head += 1;
        // The vertex may have lost its edge (or gained none back) since it
        // was enqueued; only a current degree of exactly 1 is peelable.
        if graph.vertices[vid].degree != 1 {
            continue;
        }
        let e = graph.vertices[vid].acc;
        remaining -= 1;
        order[remaining] = e;

        for lane in 0..graph.arity {
            let u = graph.edges[e as usize][lane] as usize;
            let vert = &mut graph.vertices[u];
            vert.degree -= 1;
            vert.acc ^= e;
            if vert.degree == 1 {
                queue.push(u as u32);
            }
        }
    }

    if remaining == 0 {
        Ok(order)
    } else {
        Err(ChmError::NotPeelable { core: remaining })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::TableHasher;

    fn byte_keys(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i as u8]).collect()
    }

    fn graph_from(tuples: Vec<[u32; 3]>, m: u32, arity: usize) -> Graph {
        let keys = byte_keys(tuples.len());
        let hasher = TableHasher::new(tuples);
        let mut graph = Graph::setup(m, keys.len() as u32, arity).unwrap();
        graph.populate(&keys, &hasher, false).unwrap();
        graph
    }

    #[test]
    fn triangle_has_a_core() {
        // 2-uniform triangle: no vertex is ever at degree 1.
        let mut graph = graph_from(vec![[0, 1, 0], [1, 2, 0], [2, 0, 0]], 4, 2);
        match peel(&mut graph) {
            Err(ChmError::NotPeelable { core }) => assert_eq!(core, 3),
            other => panic!("expected a non-empty core, got {other:?}"),
        }
    }

    #[test]
    fn disjoint_edges_peel_in_one_pass() {
        let mut graph = graph_from(
            vec![[0, 1, 0], [2, 3, 0], [4, 5, 0], [6, 7, 0]],
            8,
            2,
        );
        let order = peel(&mut graph).unwrap();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        // All incidence state must be fully unwound.
        assert!(graph.vertices.iter().all(|v| v.degree == 0 && v.acc == 0));
    }

    #[test]
    fn chain_peels_from_the_outside_in() {
        // Path 0-1-2-3: only the endpoints start at degree 1; peeling them
        // must expose the middle edge.
        let mut graph = graph_from(vec![[0, 1, 0], [1, 2, 0], [2, 3, 0]], 4, 2);
        let order = peel(&mut graph).unwrap();
        // order[0] is the last-peeled edge: the middle one.
        assert_eq!(order[0], 1);
    }

    #[test]
    fn triangle_plus_pendant_fails_with_partial_progress() {
        let mut graph = graph_from(
            vec![[0, 1, 0], [1, 2, 0], [2, 0, 0], [2, 3, 0]],
            4,
            2,
        );
        match peel(&mut graph) {
            Err(ChmError::NotPeelable { core }) => assert_eq!(core, 3),
            other => panic!("expected a non-empty core, got {other:?}"),
        }
    }

    #[test]
    fn arity3_shared_vertex_graph_peels() {
        // Two 3-edges sharing one vertex; plenty of degree-1 vertices.
        let mut graph = graph_from(vec![[0, 1, 2], [2, 3, 4]], 8, 3);
        let order = peel(&mut graph).unwrap();
        assert_eq!(order.len(), 2);
    }
}
