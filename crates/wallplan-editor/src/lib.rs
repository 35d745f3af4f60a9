//! Wallplan 户型编辑器会话层
//!
//! 在 `wallplan-core` 几何引擎之上提供面向输入层的命令面：
//! 画墙 / 画矩形的手势状态机、选择与编辑、配置校验、撤销重做，
//! 以及每次命令之后供外部渲染器消费的渲染帧。
//!
//! 会话是显式的上下文对象，内部不含全局状态；所有变更同步执行，
//! 一条命令完整处理结束（变更、派生重算）后才轮到下一条。
//!
//! # 示例
//!
//! ```rust
//! use wallplan_editor::prelude::*;
//!
//! let mut session = EditorSession::new();
//! session.apply(Command::StartRect(Point2::new(0.0, 0.0)));
//! session.apply(Command::FinishRect(Point2::new(3000.0, 2000.0)));
//!
//! let frame = session.render_frame();
//! assert_eq!(frame.walls.len(), 4);
//! assert_eq!(frame.spaces.len(), 1);
//! ```

pub mod command;
pub mod frame;
pub mod session;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::command::{Command, CommandOutcome};
    pub use crate::frame::{LengthLabel, Preview, RenderFrame};
    pub use crate::session::EditorSession;
    pub use wallplan_core::math::Point2;
    pub use wallplan_core::wall::{Wall, WallId};
}
