use crate::graph::Graph;
use crate::util::BitSet;

/// Computes the per-vertex output table from the removal order.
///
/// `order[0]` is the last-peeled edge. Scanning forward, every edge owns
/// exactly one not-yet-visited vertex (that is what a successful peel
/// guarantees); that vertex's value is set so the edge's g-sum mod n lands on
/// the edge's original index. Values of unassigned vertices read as 0, which
/// is why a single pass suffices.
pub(crate) fn assign(graph: &Graph, order: &[u32]) -> Vec<u32> {
    let n = order.len() as u64;
    let m = graph.vertices.len();
    let mut g = vec![0u32; m];
    let mut visited = BitSet::new(m);

    for &e in order {
        let verts = &graph.edges[e as usize][..graph.arity];
        let mut target = usize::MAX;
        let mut others = 0u64;
        for &v in verts {
            if target == usize::MAX && !visited.test(v as usize) {
                target = v as usize;
            } else {
                others += u64::from(g[v as usize]);
            }
        }
        assert!(
            target != usize::MAX,
            "removal order gave edge {e} no fresh vertex"
        );
        g[target] = ((u64::from(e) + n - others % n) % n) as u32;
        for &v in verts {
            visited.set(v as usize);
        }
    }

    // Postcondition, checked over the whole table: every edge reproduces its
    // own index.
    for (i, edge) in graph.edges.iter().enumerate() {
        let sum: u64 = edge[..graph.arity]
            .iter()
            .map(|&v| u64::from(g[v as usize]))
            .sum();
        assert!(sum % n == i as u64, "edge {i} does not reproduce its index");
    }
    g
}

/// Read-only output table `g[0..vertex_count)`, stored at the narrowest
/// unsigned width that covers `vertex_count - 1`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub enum GTable {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl GTable {
    pub(crate) fn pack(values: &[u32], vertex_count: u32) -> Self {
        let max = u64::from(vertex_count) - 1;
        if max <= u64::from(u8::MAX) {
            Self::U8(values.iter().map(|&v| v as u8).collect())
        } else if max <= u64::from(u16::MAX) {
            Self::U16(values.iter().map(|&v| v as u16).collect())
        } else {
            Self::U32(values.to_vec())
        }
    }

    #[inline]
    pub fn get(&self, idx: usize) -> u32 {
        match self {
            Self::U8(t) => u32::from(t[idx]),
            Self::U16(t) => u32::from(t[idx]),
            Self::U32(t) => t[idx],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(t) => t.len(),
            Self::U16(t) => t.len(),
            Self::U32(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes per table entry (1, 2 or 4).
    pub fn entry_bytes(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
            Self::U32(_) => 4,
        }
    }
}
