//! 转角补块
//!
//! 两面厚墙以直角相接时，描边矩形在角上留下一个缺口。
//! 对恰好被两面走向相异（一横一竖）的墙共享的顶点，生成一个
//! 以该点为中心的填充矩形盖住缺口：宽取竖墙厚度，高取横墙厚度。
//!
//! 三面以上墙交汇、或两面同向墙相接的顶点不生成补块，
//! 交由渲染端自身的描边连接处理。触发时机与闭合空间检测一致。

use crate::geometry::Orientation;
use crate::math::VertexKey;
use crate::wall::WallGraph;
use serde::Serialize;
use std::collections::BTreeMap;

/// 转角补块矩形（左上角坐标 + 尺寸）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerPatch {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 计算当前墙体图的全部转角补块
pub fn fill_corners(graph: &WallGraph) -> Vec<CornerPatch> {
    // 端点 → 在此相接的墙（厚度与走向）
    let mut corners: BTreeMap<VertexKey, Vec<(f64, Orientation)>> = BTreeMap::new();
    for wall in graph.walls() {
        let orientation = wall.orientation();
        for endpoint in wall.endpoints() {
            corners
                .entry(VertexKey::from_point(endpoint))
                .or_default()
                .push((wall.thickness, orientation));
        }
    }

    let mut patches = Vec::new();
    for (key, walls_at_corner) in corners {
        if walls_at_corner.len() != 2 {
            continue;
        }
        let (thickness_a, orient_a) = walls_at_corner[0];
        let (thickness_b, orient_b) = walls_at_corner[1];
        if orient_a == orient_b {
            continue;
        }

        // 宽来自竖墙、高来自横墙
        let (width, height) = if orient_a == Orientation::Vertical {
            (thickness_a, thickness_b)
        } else {
            (thickness_b, thickness_a)
        };
        let center = key.to_point();
        patches.push(CornerPatch {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        });
    }
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn test_l_corner_gets_patch() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(0.0, 1000.0), 80.0)
            .unwrap();

        let patches = fill_corners(&graph);
        assert_eq!(patches.len(), 1);
        // 宽 = 竖墙厚度 80，高 = 横墙厚度 100，以 (0,0) 为中心
        assert_eq!(
            patches[0],
            CornerPatch {
                x: -40.0,
                y: -50.0,
                width: 80.0,
                height: 100.0,
            }
        );
    }

    #[test]
    fn test_rectangle_has_four_patches() {
        let mut graph = WallGraph::new();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(1000.0, 0.0), Point2::new(1000.0, 1000.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(1000.0, 1000.0), Point2::new(0.0, 1000.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(0.0, 1000.0), Point2::new(0.0, 0.0), 100.0)
            .unwrap();

        assert_eq!(fill_corners(&graph).len(), 4);
    }

    #[test]
    fn test_t_junction_is_skipped() {
        let mut graph = WallGraph::new();
        // 三面墙交汇于 (0,0)
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(-1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(0.0, 1000.0), 100.0)
            .unwrap();

        assert!(fill_corners(&graph).is_empty());
    }

    #[test]
    fn test_same_orientation_pair_is_skipped() {
        let mut graph = WallGraph::new();
        // 两面横墙首尾相接
        graph
            .add_wall(Point2::new(0.0, 0.0), Point2::new(1000.0, 0.0), 100.0)
            .unwrap();
        graph
            .add_wall(Point2::new(1000.0, 0.0), Point2::new(2000.0, 0.0), 100.0)
            .unwrap();

        assert!(fill_corners(&graph).is_empty());
    }
}
