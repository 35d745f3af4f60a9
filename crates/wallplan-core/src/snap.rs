//! 捕捉解析器
//!
//! 对照当前墙体图，为光标点挑选最合适的吸附目标。
//!
//! 支持的捕捉目标：
//! - 端点 (Endpoint)
//! - 垂足 (Perpendicular) - 落在墙段范围内的垂直投影
//! - 中点 (Midpoint) - 仅一般取点模式
//!
//! 半径内无目标时原样返回取整后的输入点。对相同输入与相同
//! 墙体顺序，结果是确定的；等距候选按遍历顺序先到先得。

use crate::geometry::{distance, perpendicular_foot, round_point, segment_midpoint};
use crate::math::Point2;
use crate::wall::Wall;
use serde::{Deserialize, Serialize};

/// 捕捉模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapMode {
    /// 新墙起点：端点优先，其次垂足
    WallStart,
    /// 一般取点：端点、中点、垂足按距离竞争
    General,
    /// 移动操作：仅端点
    Move,
}

/// 捕捉目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Endpoint,
    Perpendicular,
    Midpoint,
    /// 未命中任何目标，返回原始取整点
    Raw,
}

/// 捕捉结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub point: Point2,
    pub kind: SnapKind,
}

impl SnapPoint {
    fn raw(point: Point2) -> Self {
        Self {
            point,
            kind: SnapKind::Raw,
        }
    }
}

/// 捕捉配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapConfig {
    /// 捕捉半径（毫米）
    pub snap_distance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_distance: 100.0,
        }
    }
}

/// 解析捕捉点
pub fn resolve(point: Point2, walls: &[Wall], config: &SnapConfig, mode: SnapMode) -> SnapPoint {
    let current = round_point(point);
    let radius = config.snap_distance;

    match mode {
        SnapMode::WallStart => nearest_endpoint(current, walls, radius)
            .or_else(|| nearest_perpendicular(current, walls, radius))
            .unwrap_or_else(|| SnapPoint::raw(current)),
        SnapMode::Move => {
            nearest_endpoint(current, walls, radius).unwrap_or_else(|| SnapPoint::raw(current))
        }
        SnapMode::General => {
            nearest_any(current, walls, radius).unwrap_or_else(|| SnapPoint::raw(current))
        }
    }
}

/// 最近端点（严格小于半径）
fn nearest_endpoint(current: Point2, walls: &[Wall], radius: f64) -> Option<SnapPoint> {
    let mut best = None;
    let mut min_distance = radius;
    for wall in walls {
        for endpoint in wall.endpoints() {
            let endpoint = round_point(endpoint);
            let d = distance(endpoint, current);
            if d < min_distance {
                min_distance = d;
                best = Some(SnapPoint {
                    point: endpoint,
                    kind: SnapKind::Endpoint,
                });
            }
        }
    }
    best
}

/// 最近的段内垂足
fn nearest_perpendicular(current: Point2, walls: &[Wall], radius: f64) -> Option<SnapPoint> {
    let mut best = None;
    let mut min_distance = radius;
    for wall in walls {
        if let Some(foot) = perpendicular_foot(current, wall.start, wall.end) {
            let d = distance(foot, current);
            if d < min_distance {
                min_distance = d;
                best = Some(SnapPoint {
                    point: foot,
                    kind: SnapKind::Perpendicular,
                });
            }
        }
    }
    best
}

/// 端点、中点、垂足全体按距离竞争
///
/// 每面墙的候选顺序固定为：起点、终点、中点、垂足，
/// 严格小于当前最小距离才更新，保证等距时先到先得。
fn nearest_any(current: Point2, walls: &[Wall], radius: f64) -> Option<SnapPoint> {
    let mut best = None;
    let mut min_distance = radius;
    for wall in walls {
        let mut candidates = vec![
            (round_point(wall.start), SnapKind::Endpoint),
            (round_point(wall.end), SnapKind::Endpoint),
            (segment_midpoint(wall.start, wall.end), SnapKind::Midpoint),
        ];
        if let Some(foot) = perpendicular_foot(current, wall.start, wall.end) {
            candidates.push((foot, SnapKind::Perpendicular));
        }
        for (candidate, kind) in candidates {
            let d = distance(candidate, current);
            if d < min_distance {
                min_distance = d;
                best = Some(SnapPoint {
                    point: candidate,
                    kind,
                });
            }
        }
    }
    best
}
