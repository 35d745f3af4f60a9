//! 墙体实体与墙体图存储
//!
//! `WallGraph` 是当前全部墙体的权威集合，也是撤销/重做的快照单位。
//! 所有变更操作保持两条不变式：
//! - 不存在零长度墙体（取整后两端点相同的墙不会被持久化）
//! - 批量变更之后不存在端点对近似重合（1mm 容差，不分方向）的重复墙体
//!
//! 存储本身不写历史快照；由调用方（编辑器会话）在一次完整用户
//! 编辑结束时提交，以便交点分割这类多步操作作为单个撤销单元。

use crate::geometry::{distance, distance_point_to_segment, round_point, segment_orientation, Orientation};
use crate::math::{Point2, VertexKey, MIN_SEGMENT_LENGTH};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 墙体ID - 由存储内部计数器分配的不透明标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u64);

impl WallId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// 墙体 - 带厚度的直线段，绘制与编辑的原子单元
///
/// 在图意义上无方向；start/end 仅作为渲染时的规范方向保留。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    pub start: Point2,
    pub end: Point2,
    /// 厚度（毫米，正整数）
    pub thickness: f64,
}

impl Wall {
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    pub fn midpoint(&self) -> Point2 {
        crate::geometry::segment_midpoint(self.start, self.end)
    }

    pub fn orientation(&self) -> Orientation {
        segment_orientation(self.start, self.end)
    }

    pub fn endpoints(&self) -> [Point2; 2] {
        [self.start, self.end]
    }

    /// 两端点在容差内与给定线段一致（不区分方向）
    pub fn matches_segment(&self, start: Point2, end: Point2, tolerance: f64) -> bool {
        (distance(self.start, start) <= tolerance && distance(self.end, end) <= tolerance)
            || (distance(self.start, end) <= tolerance && distance(self.end, start) <= tolerance)
    }
}

/// 墙体图存储
#[derive(Debug, Default)]
pub struct WallGraph {
    walls: Vec<Wall>,
    next_id: u64,
}

impl WallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按插入顺序访问全部墙体
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    pub fn get(&self, id: WallId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// 新增墙体
    ///
    /// 端点先取整；取整后两端点重合则拒绝（返回 `None`，不变更）。
    pub fn add_wall(&mut self, start: Point2, end: Point2, thickness: f64) -> Option<WallId> {
        let start = round_point(start);
        let end = round_point(end);
        if start == end {
            return None;
        }

        let id = WallId(self.next_id);
        self.next_id += 1;
        self.walls.push(Wall {
            id,
            start,
            end,
            thickness,
        });
        Some(id)
    }

    /// 按ID移除墙体；不存在时为无操作并返回 `false`
    pub fn remove_wall(&mut self, id: WallId) -> bool {
        let before = self.walls.len();
        self.walls.retain(|w| w.id != id);
        self.walls.len() != before
    }

    /// 原子地用若干子段替换一面墙（交点分割专用）
    ///
    /// 子段继承原墙厚度；长度不足 1mm 的子段被丢弃。
    /// `old_id` 不存在时整体无操作，返回空列表。
    pub fn replace_segment(&mut self, old_id: WallId, segments: &[(Point2, Point2)]) -> Vec<WallId> {
        let Some(old) = self.get(old_id) else {
            return Vec::new();
        };
        let thickness = old.thickness;

        self.remove_wall(old_id);
        let mut created = Vec::new();
        for &(start, end) in segments {
            if distance(round_point(start), round_point(end)) > MIN_SEGMENT_LENGTH {
                if let Some(id) = self.add_wall(start, end, thickness) {
                    created.push(id);
                }
            }
        }
        debug!(
            old = old_id.raw(),
            pieces = created.len(),
            "replaced wall with split segments"
        );
        created
    }

    /// 在半径内查找离点最近的墙
    pub fn find_nearest(&self, point: Point2, radius: f64) -> Option<WallId> {
        let mut closest = None;
        let mut min_distance = radius;
        for wall in &self.walls {
            let d = distance_point_to_segment(point, wall.start, wall.end);
            if d < min_distance {
                min_distance = d;
                closest = Some(wall.id);
            }
        }
        closest
    }

    /// 平移一面墙的两个端点（取整后写回）
    ///
    /// 目标墙不存在，或平移会产生零长度墙时无操作返回 `false`。
    pub fn translate_wall(&mut self, id: WallId, dx: f64, dy: f64) -> bool {
        let Some(wall) = self.walls.iter_mut().find(|w| w.id == id) else {
            return false;
        };
        let start = round_point(Point2::new(wall.start.x + dx, wall.start.y + dy));
        let end = round_point(Point2::new(wall.end.x + dx, wall.end.y + dy));
        if start == end {
            return false;
        }
        wall.start = start;
        wall.end = end;
        true
    }

    /// 修改一面墙的厚度；目标不存在时无操作返回 `false`
    pub fn set_thickness(&mut self, id: WallId, thickness: f64) -> bool {
        let Some(wall) = self.walls.iter_mut().find(|w| w.id == id) else {
            return false;
        };
        wall.thickness = thickness;
        true
    }

    /// 去重：移除端点对近似重合（1mm 容差，不分方向）的后来者
    ///
    /// 在每次批量变更之后调用。返回移除数量。
    pub fn dedup(&mut self) -> usize {
        let mut kept: Vec<Wall> = Vec::with_capacity(self.walls.len());
        let mut removed = 0;
        for wall in self.walls.drain(..) {
            let duplicate = kept
                .iter()
                .any(|k| k.matches_segment(wall.start, wall.end, MIN_SEGMENT_LENGTH));
            if duplicate {
                removed += 1;
            } else {
                kept.push(wall);
            }
        }
        self.walls = kept;
        if removed > 0 {
            debug!(removed, "deduplicated wall graph");
        }
        removed
    }

    /// 清空存储（撤销/重做恢复前调用）
    ///
    /// ID 计数器不回退，保证恢复后的墙体拿到新ID。
    pub fn clear(&mut self) {
        self.walls.clear();
    }

    /// 所有去重后的端点顶点键（按键序）
    pub fn vertex_keys(&self) -> Vec<VertexKey> {
        let mut keys: Vec<VertexKey> = self
            .walls
            .iter()
            .flat_map(|w| [VertexKey::from_point(w.start), VertexKey::from_point(w.end)])
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wall_rounds_endpoints() {
        let mut graph = WallGraph::new();
        let id = graph
            .add_wall(Point2::new(0.4, 0.6), Point2::new(999.7, 0.2), 100.0)
            .unwrap();
        let wall = graph.get(id).unwrap();
        assert_eq!(wall.start, Point2::new(0.0, 1.0));
        assert_eq!(wall.end, Point2::new(1000.0, 0.0));
    }

    #[test]
    fn test_add_wall_rejects_zero_length() {
        let mut graph = WallGraph::new();
        // 取整后两端点重合
        let id = graph.add_wall(Point2::new(10.2, 10.2), Point2::new(9.8, 10.4), 100.0);
        assert_eq!(id, None);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_wall_absent_is_noop() {
        let mut graph = WallGraph::new();
        let id = graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        assert!(graph.remove_wall(id));
        assert!(!graph.remove_wall(id));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_replace_segment_discards_short_pieces() {
        let mut graph = WallGraph::new();
        let id = graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 80.0)
            .unwrap();

        let created = graph.replace_segment(
            id,
            &[
                (Point2::new(0.0, 0.0), Point2::new(999.0, 0.0)),
                // 1mm 的残段应被丢弃
                (Point2::new(999.0, 0.0), Point2::new(1000.0, 0.0)),
            ],
        );
        assert_eq!(created.len(), 1);
        assert_eq!(graph.len(), 1);
        // 子段继承原厚度
        assert_eq!(graph.get(created[0]).unwrap().thickness, 80.0);
    }

    #[test]
    fn test_replace_segment_absent_is_noop() {
        let mut graph = WallGraph::new();
        let id = graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph.remove_wall(id);
        let created =
            graph.replace_segment(id, &[(Point2::new(0.0, 0.0), Point2::new(500.0, 0.0))]);
        assert!(created.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_find_nearest_respects_radius() {
        let mut graph = WallGraph::new();
        let id = graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();

        assert_eq!(graph.find_nearest(Point2::new(500.0, 50.0), 100.0), Some(id));
        assert_eq!(graph.find_nearest(Point2::new(500.0, 200.0), 100.0), None);
    }

    #[test]
    fn test_dedup_removes_reversed_duplicate() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(1000.0, 0.0), Point2::new(0.0, 0.0), 100.0)
            .unwrap();
        assert_eq!(graph.dedup(), 1);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_translate_wall() {
        let mut graph = WallGraph::new();
        let id = graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        assert!(graph.translate_wall(id, 10.4, -20.4));
        let wall = graph.get(id).unwrap();
        assert_eq!(wall.start, Point2::new(10.0, -20.0));
        assert_eq!(wall.end, Point2::new(1010.0, -20.0));
    }

    #[test]
    fn test_vertex_keys_deduplicated() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(1000.0, 0.0), Point2::new(1000.0, 1000.0), 100.0)
            .unwrap();
        let keys = graph.vertex_keys();
        assert_eq!(
            keys,
            vec![VertexKey(0, 0), VertexKey(1000, 0), VertexKey(1000, 1000)]
        );
    }
}
