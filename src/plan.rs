//! Pattern planning: which index to walk, and how.
//!
//! The planner only looks at which positions of the pattern are bound and
//! which orders are configured, never at index sizes. For every boundedness
//! signature there are two orders that put the bound positions first; if
//! neither is configured the plan degrades to a shorter shared prefix with
//! filtering, and in the last resort to a filtered full scan of the default
//! order, which is always configured.

use crate::index::Order;
use crate::quad::Pattern;

/// How an iterator walks its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchMode {
    /// Walk the whole index.
    All,
    /// At most one element (fully bound pattern).
    Single,
    /// Walk the contiguous range sharing the bound prefix.
    Range,
    /// Walk a range sharing a shorter prefix, filtering each element.
    FilterRange,
    /// Walk the whole index, filtering each element.
    FilterAll,
}

/// Pick the best configured order for `pattern`, returning the order, the
/// iteration mode, and the length of the bound key prefix.
pub(crate) fn best_index<F>(configured: F, pattern: &Pattern) -> (Order, SearchMode, usize)
where
    F: Fn(Order) -> bool,
{
    let graph_search = pattern.g.is_some();
    let sig = ((pattern.s.is_some() as usize) << 2)
        | ((pattern.p.is_some() as usize) << 1)
        | (pattern.o.is_some() as usize);

    if sig == 0b111 {
        // Fully bound patterns hit at most one element; the graph-prefixed
        // default is preferred, but any order works on a full key.
        return if graph_search && configured(Order::DEFAULT_GRAPH) {
            (Order::DEFAULT_GRAPH, SearchMode::Single, 0)
        } else {
            (Order::DEFAULT, SearchMode::Single, 0)
        };
    }
    if sig == 0b000 {
        return if !graph_search {
            (Order::DEFAULT, SearchMode::All, 0)
        } else if configured(Order::DEFAULT_GRAPH) {
            (Order::DEFAULT_GRAPH, SearchMode::Range, 1)
        } else {
            (Order::DEFAULT, SearchMode::FilterAll, 0)
        };
    }

    // Orders that put every bound position in the prefix.
    let (good, n_prefix) = match sig {
        0b001 => ([Order::Ops, Order::Osp], 1),
        0b010 => ([Order::Pos, Order::Pso], 1),
        0b011 => ([Order::Ops, Order::Pos], 2),
        0b100 => ([Order::Spo, Order::Sop], 1),
        0b101 => ([Order::Sop, Order::Osp], 2),
        0b110 => ([Order::Spo, Order::Pso], 2),
        _ => unreachable!(),
    };
    for order in good {
        if let Some((order, n_prefix)) = pick(&configured, order, n_prefix, graph_search) {
            return (order, SearchMode::Range, n_prefix);
        }
    }

    // Two bound positions, only one of them leading: still a range, but the
    // trailing bound position must be filtered for.
    let partial = match sig {
        0b011 => Some([Order::Osp, Order::Pso]),
        0b101 => Some([Order::Spo, Order::Ops]),
        0b110 => Some([Order::Sop, Order::Pos]),
        _ => None,
    };
    if let Some(partial) = partial {
        for order in partial {
            if let Some((order, n_prefix)) = pick(&configured, order, 1, graph_search) {
                return (order, SearchMode::FilterRange, n_prefix);
            }
        }
    }

    if graph_search && configured(Order::DEFAULT_GRAPH) {
        (Order::DEFAULT_GRAPH, SearchMode::FilterRange, 1)
    } else {
        (Order::DEFAULT, SearchMode::FilterAll, 0)
    }
}

/// Map `order` to its graph-prefixed form when G is bound, and report it if
/// configured.
fn pick<F>(
    configured: &F,
    order: Order,
    n_prefix: usize,
    graph_search: bool,
) -> Option<(Order, usize)>
where
    F: Fn(Order) -> bool,
{
    let (order, n_prefix) = if graph_search {
        (order.with_graph(), n_prefix + 1)
    } else {
        (order, n_prefix)
    };
    configured(order).then_some((order, n_prefix))
}
