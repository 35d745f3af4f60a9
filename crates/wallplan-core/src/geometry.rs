//! 几何内核
//!
//! 纯函数集合，无任何状态：
//! - 坐标取整 (snap_to_grid / round_point)
//! - 正交约束 (orthogonal_project)
//! - 点到线段距离 (distance_point_to_segment)
//! - 线段求交 (segment_intersection)
//! - 多边形面积 (polygon_area)
//!
//! 所有返回的点都已经过毫米取整。

use crate::math::{Point2, DRAWABLE_BOUNDARY, EPSILON};

/// 线段走向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// 将单个坐标取整到最近的整数毫米
///
/// 幂等：`snap_to_grid(snap_to_grid(v)) == snap_to_grid(v)`
pub fn snap_to_grid(value: f64) -> f64 {
    value.round()
}

/// 对点的两个分量分别取整
pub fn round_point(p: Point2) -> Point2 {
    Point2::new(snap_to_grid(p.x), snap_to_grid(p.y))
}

/// 正交约束：把终点投影到过起点的水平线或垂直线上
///
/// 以位移较大的轴为准；`|dx| == |dy|` 时取垂直（严格大于判定）。
pub fn orthogonal_project(start: Point2, end: Point2) -> Point2 {
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();
    if dx > dy {
        round_point(Point2::new(end.x, start.y))
    } else {
        round_point(Point2::new(start.x, end.y))
    }
}

/// 点到线段的距离
///
/// 投影参数落在 [0,1] 内取垂直距离，否则取到最近端点的距离。
/// 退化情形 `a == b` 时返回到 `a` 的距离。
pub fn distance_point_to_segment(point: Point2, a: Point2, b: Point2) -> f64 {
    let v = b - a;
    let w = point - a;

    let c1 = w.dot(&v);
    if c1 <= 0.0 {
        return (point - a).norm();
    }

    let c2 = v.dot(&v);
    if c2 <= c1 {
        return (point - b).norm();
    }

    let t = c1 / c2;
    let foot = a + v * t;
    (point - foot).norm()
}

/// 线段在其自身方向上的垂足
///
/// 返回参考点到线段所在直线的垂足，且垂足必须落在线段范围内，
/// 否则返回 `None`。退化线段同样返回 `None`。
pub fn perpendicular_foot(point: Point2, a: Point2, b: Point2) -> Option<Point2> {
    let v = b - a;
    let c2 = v.dot(&v);
    if c2 < EPSILON {
        return None;
    }

    let t = (point - a).dot(&v) / c2;
    if (0.0..=1.0).contains(&t) {
        Some(round_point(a + v * t))
    } else {
        None
    }
}

/// 线段-线段求交
///
/// 标准参数式求交。分母为零（平行或共线）视为无交点；
/// 参数 `ua`、`ub` 任一落在 [0,1] 之外也视为无交点。
/// 交点经 `round_point` 取整后返回。
pub fn segment_intersection(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let denominator = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denominator.abs() < EPSILON {
        return None;
    }

    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denominator;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denominator;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(round_point(Point2::new(
        p1.x + ua * (p2.x - p1.x),
        p1.y + ua * (p2.y - p1.y),
    )))
}

/// 鞋带公式计算多边形面积（绝对值，任意绕向）
pub fn polygon_area(points: &[Point2]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        area += points[i].x * points[j].y;
        area -= points[i].y * points[j].x;
    }
    area.abs() / 2.0
}

/// 线段中点（取整）
pub fn segment_midpoint(a: Point2, b: Point2) -> Point2 {
    round_point(Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0))
}

/// 两点距离
pub fn distance(a: Point2, b: Point2) -> f64 {
    (b - a).norm()
}

/// 以主轴判定线段走向：`|dy| < |dx|` 为水平，否则为垂直
pub fn segment_orientation(a: Point2, b: Point2) -> Orientation {
    if (a.y - b.y).abs() < (a.x - b.x).abs() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}

/// 点是否落在可绘制区域内
pub fn is_within_boundary(p: Point2) -> bool {
    p.x.abs() <= DRAWABLE_BOUNDARY && p.y.abs() <= DRAWABLE_BOUNDARY
}
