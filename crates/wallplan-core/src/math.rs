//! 数学基础类型与毫米单位常量
//!
//! 整个引擎以毫米为固定工作单位，所有持久化坐标在每次
//! 变更边界处取整到整数毫米，保证图键比较的精确性。

use serde::{Deserialize, Serialize};

/// 二维点（毫米）
pub type Point2 = nalgebra::Point2<f64>;
/// 二维向量（毫米）
pub type Vector2 = nalgebra::Vector2<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-9;

/// 可绘制区域边界：上下左右 50m（毫米单位）
pub const DRAWABLE_BOUNDARY: f64 = 50_000.0;

/// 不超过此长度的墙段视为退化，不予保留（毫米）
pub const MIN_SEGMENT_LENGTH: f64 = 1.0;

/// 不超过此面积的闭合空间视为退化（平方毫米）
pub const MIN_SPACE_AREA: f64 = 100.0;

/// 顶点键 - 取整后的整数毫米坐标对
///
/// 两面墙在某顶点"相连"当且仅当取整后的端点键完全相等。
/// 用整数对代替字符串格式化坐标，避免浮点字符串表示问题。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexKey(pub i32, pub i32);

impl VertexKey {
    pub fn from_point(p: Point2) -> Self {
        Self(p.x.round() as i32, p.y.round() as i32)
    }

    pub fn to_point(self) -> Point2 {
        Point2::new(self.0 as f64, self.1 as f64)
    }
}
