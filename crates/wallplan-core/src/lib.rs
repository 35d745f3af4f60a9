//! Wallplan 核心墙体图几何引擎
//!
//! 为交互式 2D 户型编辑器提供几何与状态内核：
//! - 毫米取整与正交约束
//! - 捕捉解析（端点 / 垂足 / 中点）
//! - 墙体图存储（增删、分割替换、去重）
//! - 交点分割引擎
//! - 闭合空间（房间）检测与转角补块
//! - 以全图快照为单位的撤销/重做历史
//!
//! # 架构设计
//!
//! 存储是唯一的权威可变状态；闭合空间、转角补块等都是每次
//! 变更后全量重算的派生数据。引擎本身单线程同步执行，
//! 多线程嵌入方需要在外部做单写者串行化。
//!
//! # 示例
//!
//! ```rust
//! use wallplan_core::prelude::*;
//!
//! let mut graph = WallGraph::new();
//! graph.add_wall(Point2::new(0.0, 0.0), Point2::new(2000.0, 0.0), 100.0).unwrap();
//!
//! // 一面竖墙横穿而过：两面墙都在 (1000,0) 处被分割
//! let plan = intersect::plan_insertion(
//!     &graph,
//!     Point2::new(1000.0, -1000.0),
//!     Point2::new(1000.0, 1000.0),
//!     100.0,
//! );
//! intersect::apply_plan(&mut graph, plan);
//! assert_eq!(graph.len(), 4);
//! ```

pub mod corners;
pub mod geometry;
pub mod history;
pub mod intersect;
pub mod math;
pub mod snap;
pub mod spaces;
pub mod wall;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::corners::{fill_corners, CornerPatch};
    pub use crate::geometry::{self, Orientation};
    pub use crate::history::{History, HistoryError, Snapshot, SnapshotWall};
    pub use crate::intersect::{self, PlannedWall, SplitPlan};
    pub use crate::math::{Point2, Vector2, VertexKey, DRAWABLE_BOUNDARY, EPSILON};
    pub use crate::snap::{self, SnapConfig, SnapKind, SnapMode, SnapPoint};
    pub use crate::spaces::{detect_closed_spaces, ClosedSpace};
    pub use crate::wall::{Wall, WallGraph, WallId};
}
