//! 交点分割引擎
//!
//! 给定一段待插入的新墙，计算它与既有墙体的全部交叉点，
//! 产出一份分割计划：
//! - 被交叉的既有墙 → 在交点处一分为二（继承原厚度）
//! - 新墙自身 → 按交点顺序分解为一串子段
//!
//! 计划由调用方原子地应用到存储，并作为单个历史快照提交。
//! 平行/共线的重叠不产生交点，也不做合并（见 DESIGN.md）。

use crate::geometry::{distance, round_point, segment_intersection};
use crate::math::{Point2, MIN_SEGMENT_LENGTH};
use crate::wall::{WallGraph, WallId};
use tracing::debug;

/// 新墙与一面既有墙的交叉
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub point: Point2,
    pub wall_id: WallId,
}

/// 计划中的新墙段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedWall {
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
}

/// 分割计划 - 原子应用到存储的变更集
#[derive(Debug, Default)]
pub struct SplitPlan {
    /// 被交叉、需移除的既有墙
    pub remove: Vec<WallId>,
    /// 被交叉墙的替换子段（按被移除墙分组）
    pub replacements: Vec<(WallId, [(Point2, Point2); 2])>,
    /// 新墙分解出的子段
    pub create: Vec<PlannedWall>,
}

impl SplitPlan {
    /// 计划是否不含任何变更
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.create.is_empty()
    }
}

/// 找出新段与既有墙体的全部交点，按距新段起点的距离排序
///
/// 落在既有墙自身端点 1mm 范围内的交点被丢弃，避免在共享
/// 角点处产生虚假分割。
pub fn find_intersections(graph: &WallGraph, start: Point2, end: Point2) -> Vec<Intersection> {
    let mut hits = Vec::new();
    for wall in graph.walls() {
        let Some(point) = segment_intersection(start, end, wall.start, wall.end) else {
            continue;
        };
        if distance(point, wall.start) <= MIN_SEGMENT_LENGTH
            || distance(point, wall.end) <= MIN_SEGMENT_LENGTH
        {
            continue;
        }
        hits.push(Intersection {
            point,
            wall_id: wall.id,
        });
    }
    hits.sort_by(|a, b| {
        let da = distance(a.point, start);
        let db = distance(b.point, start);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
    hits
}

/// 为一段新墙生成分割计划
///
/// 新墙取整后为零长度时返回空计划。
pub fn plan_insertion(
    graph: &WallGraph,
    start: Point2,
    end: Point2,
    thickness: f64,
) -> SplitPlan {
    let start = round_point(start);
    let end = round_point(end);

    let mut plan = SplitPlan::default();
    if start == end {
        return plan;
    }

    let hits = find_intersections(graph, start, end);

    // 被交叉的既有墙：一分为二
    for hit in &hits {
        // 交点已在 find_intersections 中避开端点，两半必然非退化，
        // 但替换时仍由存储统一丢弃 1mm 以下残段
        if let Some(wall) = graph.get(hit.wall_id) {
            plan.remove.push(hit.wall_id);
            plan.replacements
                .push((hit.wall_id, [(wall.start, hit.point), (hit.point, wall.end)]));
        }
    }

    // 新墙：起点 → 各交点 → 终点 的链条
    let mut current = start;
    for next in hits.iter().map(|h| h.point).chain(std::iter::once(end)) {
        if distance(current, next) > MIN_SEGMENT_LENGTH {
            plan.create.push(PlannedWall {
                start: current,
                end: next,
                thickness,
            });
        }
        current = next;
    }

    plan
}

/// 原子应用分割计划，随后对全图去重
///
/// 返回新建墙体的ID列表。
pub fn apply_plan(graph: &mut WallGraph, plan: SplitPlan) -> Vec<WallId> {
    let mut created = Vec::new();
    for (old_id, pieces) in &plan.replacements {
        created.extend(graph.replace_segment(*old_id, pieces));
    }
    for planned in &plan.create {
        if let Some(id) = graph.add_wall(planned.start, planned.end, planned.thickness) {
            created.push(id);
        }
    }
    graph.dedup();
    debug!(
        removed = plan.remove.len(),
        created = created.len(),
        "applied split plan"
    );
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::VertexKey;

    #[test]
    fn test_cross_splits_both_walls() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(2000.0, 0.0), 100.0)
            .unwrap();

        let plan = plan_insertion(
            &graph,
            Point2::new(1000.0, -1000.0),
            Point2::new(1000.0, 1000.0),
            100.0,
        );
        assert_eq!(plan.remove.len(), 1);
        assert_eq!(plan.create.len(), 2);

        apply_plan(&mut graph, plan);
        assert_eq!(graph.len(), 4);

        // 四面墙共享顶点 (1000,0)
        let shared = VertexKey(1000, 0);
        let touching = graph
            .walls()
            .iter()
            .filter(|w| {
                VertexKey::from_point(w.start) == shared || VertexKey::from_point(w.end) == shared
            })
            .count();
        assert_eq!(touching, 4);
    }

    #[test]
    fn test_split_covers_original_extent() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(2000.0, 0.0), 100.0)
            .unwrap();

        let plan = plan_insertion(
            &graph,
            Point2::new(1000.0, -1000.0),
            Point2::new(1000.0, 1000.0),
            100.0,
        );
        apply_plan(&mut graph, plan);

        // 原水平墙的延展被两个子段精确覆盖
        let horizontal: Vec<_> = graph
            .walls()
            .iter()
            .filter(|w| w.start.y == 0.0 && w.end.y == 0.0)
            .collect();
        assert_eq!(horizontal.len(), 2);
        let mut xs: Vec<(f64, f64)> = horizontal
            .iter()
            .map(|w| (w.start.x.min(w.end.x), w.start.x.max(w.end.x)))
            .collect();
        xs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_eq!(xs, vec![(0.0, 1000.0), (1000.0, 2000.0)]);
    }

    #[test]
    fn test_intersection_at_existing_endpoint_is_ignored() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();

        // 新墙恰好穿过既有墙的端点：不分割
        let plan = plan_insertion(
            &graph,
            Point2::new(1000.0, -500.0),
            Point2::new(1000.0, 500.0),
            100.0,
        );
        assert!(plan.remove.is_empty());
        assert_eq!(plan.create.len(), 1);

        apply_plan(&mut graph, plan);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_multiple_crossings_sorted_along_segment() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(500.0, -500.0), Point2::new(500.0, 500.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(1500.0, -500.0), Point2::new(1500.0, 500.0), 100.0)
            .unwrap();

        let plan = plan_insertion(
            &graph,
            Point2::new(0.0, 0.0),
            Point2::new(2000.0, 0.0),
            100.0,
        );
        assert_eq!(plan.remove.len(), 2);
        // 链条：0 → 500 → 1500 → 2000
        assert_eq!(plan.create.len(), 3);
        assert_eq!(plan.create[0].start, Point2::new(0.0, 0.0));
        assert_eq!(plan.create[0].end, Point2::new(500.0, 0.0));
        assert_eq!(plan.create[1].end, Point2::new(1500.0, 0.0));
        assert_eq!(plan.create[2].end, Point2::new(2000.0, 0.0));

        apply_plan(&mut graph, plan);
        // 2 面墙各分两半 + 新墙 3 段
        assert_eq!(graph.len(), 7);
    }

    #[test]
    fn test_duplicate_wall_removed_by_dedup() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();

        // 与既有墙完全相同的新墙：共线无交点，去重后只剩一面
        let plan = plan_insertion(
            &graph,
            Point2::new(0.0, 0.0),
            Point2::new(1000.0, 0.0),
            100.0,
        );
        apply_plan(&mut graph, plan);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_collinear_overlap_is_not_merged() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();

        // 部分重叠的共线墙：既不相交也不合并，二者并存
        let plan = plan_insertion(
            &graph,
            Point2::new(500.0, 0.0),
            Point2::new(1500.0, 0.0),
            100.0,
        );
        apply_plan(&mut graph, plan);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_zero_length_plan_is_empty() {
        let graph = WallGraph::new();
        let plan = plan_insertion(
            &graph,
            Point2::new(10.2, 10.2),
            Point2::new(10.4, 9.8),
            100.0,
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn test_no_zero_length_walls_after_operations() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(2000.0, 0.0), 100.0)
            .unwrap();
        for x in [500.0, 1000.0, 1500.0] {
            let plan = plan_insertion(
                &graph,
                Point2::new(x, -1000.0),
                Point2::new(x, 1000.0),
                100.0,
            );
            apply_plan(&mut graph, plan);
        }
        assert!(graph.walls().iter().all(|w| w.start != w.end));
    }
}
