//! 撤销/重做历史
//!
//! 以序列化后的完整墙体图快照为单位：撤销栈顶永远是"当前状态"，
//! 每次完成的用户编辑压入一个新快照并清空重做栈。快照只含
//! 墙体列表（含厚度），其余派生状态（闭合空间、转角补块、标注）
//! 恢复后由调用方确定性重算。
//!
//! 快照的编解码失败属于内部错误（用户输入不可能触达），
//! 用 `HistoryError` 上抛而不是静默吞掉。

use crate::math::Point2;
use crate::wall::WallGraph;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 快照中的单面墙
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotWall {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub thickness: f64,
}

/// 墙体图快照 - 足以确定性重建其余一切
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub walls: Vec<SnapshotWall>,
}

impl Snapshot {
    /// 抓取当前图的快照
    pub fn capture(graph: &WallGraph) -> Self {
        Self {
            walls: graph
                .walls()
                .iter()
                .map(|w| SnapshotWall {
                    x1: w.start.x,
                    y1: w.start.y,
                    x2: w.end.x,
                    y2: w.end.y,
                    thickness: w.thickness,
                })
                .collect(),
        }
    }

    /// 清空存储并从快照重建全部墙体
    ///
    /// 墙体ID不保留；几何与厚度逐一复原。
    pub fn restore_into(&self, graph: &mut WallGraph) {
        graph.clear();
        for wall in &self.walls {
            graph.add_wall(
                Point2::new(wall.x1, wall.y1),
                Point2::new(wall.x2, wall.y2),
                wall.thickness,
            );
        }
    }
}

/// 历史错误
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// 历史管理器
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<String>,
    redo_stack: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交一个快照：压入撤销栈，清空重做栈
    pub fn commit(&mut self, snapshot: &Snapshot) -> Result<(), HistoryError> {
        let encoded = serde_json::to_string(snapshot).map_err(HistoryError::Encode)?;
        self.undo_stack.push(encoded);
        self.redo_stack.clear();
        debug!(depth = self.undo_stack.len(), "committed snapshot");
        Ok(())
    }

    /// 撤销：栈顶（当前状态）移入重做栈，返回新的栈顶快照
    ///
    /// 撤销栈只剩一个条目（当前状态即初始状态）时无操作。
    pub fn undo(&mut self) -> Result<Option<Snapshot>, HistoryError> {
        if self.undo_stack.len() <= 1 {
            return Ok(None);
        }
        if let Some(current) = self.undo_stack.pop() {
            self.redo_stack.push(current);
        }

        let Some(top) = self.undo_stack.last() else {
            return Ok(None);
        };
        let snapshot = serde_json::from_str(top).map_err(HistoryError::Decode)?;
        debug!(depth = self.undo_stack.len(), "undo");
        Ok(Some(snapshot))
    }

    /// 重做：重做栈弹出一个条目压回撤销栈，并返回它
    pub fn redo(&mut self) -> Result<Option<Snapshot>, HistoryError> {
        let Some(encoded) = self.redo_stack.pop() else {
            return Ok(None);
        };
        let snapshot = serde_json::from_str(&encoded).map_err(HistoryError::Decode)?;
        self.undo_stack.push(encoded);
        debug!(depth = self.undo_stack.len(), "redo");
        Ok(Some(snapshot))
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo_stack.len()
    }
}
