//! 闭合空间检测
//!
//! 把墙体图视作取整顶点上的无向平面图：顶点是墙端点的
//! `VertexKey`，边是墙体。从每个顶点出发做深度优先搜索，
//! 以"访问过的边"（而非顶点）为回溯依据枚举回到起点的简单环，
//! 再对环做规范化去重并过滤退化面积。
//!
//! 最坏情况对稠密图是指数级的；户型图顶点度通常不超过 4，
//! 实际规模下可以接受。每次图变更后全量重算，不做增量维护。

use crate::geometry::polygon_area;
use crate::math::{Point2, VertexKey, MIN_SPACE_AREA};
use crate::wall::WallGraph;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// 闭合空间（房间）- 派生的瞬态多边形，不参与持久化
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedSpace {
    /// 环上的顶点序列（首尾相接，不重复首点）
    pub points: Vec<Point2>,
    /// 鞋带公式面积（平方毫米）
    pub area: f64,
}

type Adjacency = BTreeMap<VertexKey, BTreeSet<VertexKey>>;

/// 检测当前墙体图中的全部闭合空间
pub fn detect_closed_spaces(graph: &WallGraph) -> Vec<ClosedSpace> {
    let mut adjacency: Adjacency = BTreeMap::new();
    for wall in graph.walls() {
        let a = VertexKey::from_point(wall.start);
        let b = VertexKey::from_point(wall.end);
        if a == b {
            continue;
        }
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }

    let mut cycles: BTreeSet<Vec<VertexKey>> = BTreeSet::new();
    for &start in adjacency.keys() {
        let mut visited_edges = BTreeSet::new();
        let mut path = vec![start];
        search_cycles(start, start, &adjacency, &mut visited_edges, &mut path, &mut cycles);
    }

    cycles
        .into_iter()
        .filter(|cycle| cycle.len() >= 4)
        .filter_map(|cycle| {
            let points: Vec<Point2> = cycle.iter().map(|k| k.to_point()).collect();
            let area = polygon_area(&points);
            (area > MIN_SPACE_AREA).then_some(ClosedSpace { points, area })
        })
        .collect()
}

/// 从 `current` 出发继续搜索回到 `start` 的环
///
/// `path` 含当前顶点；长度达到 3 且起点是当前顶点的邻居时
/// 记录一个环并停止延伸（继续延伸只会产生绕更远的重复环）。
fn search_cycles(
    current: VertexKey,
    start: VertexKey,
    adjacency: &Adjacency,
    visited_edges: &mut BTreeSet<(VertexKey, VertexKey)>,
    path: &mut Vec<VertexKey>,
    cycles: &mut BTreeSet<Vec<VertexKey>>,
) {
    let Some(neighbors) = adjacency.get(&current) else {
        return;
    };

    if path.len() >= 3 && neighbors.contains(&start) {
        cycles.insert(normalize_cycle(path));
        return;
    }

    for &next in neighbors {
        let edge = undirected_edge(current, next);
        if visited_edges.contains(&edge) {
            continue;
        }
        // 除起点外不允许重访路径上的顶点（保持环的简单性）
        if path.contains(&next) && next != start {
            continue;
        }
        visited_edges.insert(edge);
        path.push(next);
        search_cycles(next, start, adjacency, visited_edges, path, cycles);
        path.pop();
        visited_edges.remove(&edge);
    }
}

fn undirected_edge(a: VertexKey, b: VertexKey) -> (VertexKey, VertexKey) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// 环的规范形：旋转到最小顶点开头，并在两个绕向中取字典序较小者
///
/// 不同起点、不同方向找到的同一个环由此折叠为同一表示。
fn normalize_cycle(path: &[VertexKey]) -> Vec<VertexKey> {
    let n = path.len();
    let rotate_to_min = |seq: &[VertexKey]| -> Vec<VertexKey> {
        let min_idx = seq
            .iter()
            .enumerate()
            .min_by_key(|(_, k)| **k)
            .map(|(i, _)| i)
            .unwrap_or(0);
        (0..n).map(|i| seq[(min_idx + i) % n]).collect()
    };

    let forward = rotate_to_min(path);
    let mut reversed = path.to_vec();
    reversed.reverse();
    let backward = rotate_to_min(&reversed);
    forward.min(backward)
}
