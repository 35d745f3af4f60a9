//! 渲染帧
//!
//! 每次命令处理完成后暴露给外部渲染器的派生快照：墙体列表、
//! 闭合空间多边形、转角补块、长度标注、端点标记以及进行中的
//! 预览几何。渲染方只读消费，自行决定何时重绘；内核不做任何
//! 隐式响应式通知。

use serde::Serialize;
use wallplan_core::corners::CornerPatch;
use wallplan_core::geometry::{distance, segment_midpoint};
use wallplan_core::math::Point2;
use wallplan_core::spaces::ClosedSpace;
use wallplan_core::wall::{Wall, WallId};

/// 长度标注 - 整数毫米文本与摆放位置（渲染方自行追加单位）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthLabel {
    pub text: String,
    pub position: Point2,
}

impl LengthLabel {
    /// 两点间的长度标注：取整毫米数 + 中点位置
    pub fn between(a: Point2, b: Point2) -> Self {
        Self {
            text: format!("{}", distance(a, b).round() as i64),
            position: segment_midpoint(a, b),
        }
    }

    pub fn at(text: impl Into<String>, position: Point2) -> Self {
        Self {
            text: text.into(),
            position,
        }
    }
}

/// 进行中手势的预览几何（虚线显示，不属于墙体图）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Preview {
    Wall {
        start: Point2,
        end: Point2,
        label: LengthLabel,
    },
    Rect {
        /// 上、右、下、左四条边
        edges: [(Point2, Point2); 4],
        width_label: LengthLabel,
        height_label: LengthLabel,
    },
}

/// 渲染帧
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub walls: Vec<Wall>,
    pub spaces: Vec<ClosedSpace>,
    pub corners: Vec<CornerPatch>,
    /// 每面墙一条长度标注（中点处）
    pub labels: Vec<LengthLabel>,
    /// 去重后的墙端点标记
    pub key_points: Vec<Point2>,
    pub preview: Option<Preview>,
    pub selected: Option<WallId>,
}
