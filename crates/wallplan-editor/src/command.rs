//! 命令面
//!
//! 上层输入协作方（键鼠翻译层、快捷键表）把离散输入事件翻译成
//! 这里的 `Command`，逐条喂给编辑器会话。坐标一律是文档空间的
//! 毫米坐标，设备坐标到逻辑坐标的变换在外部完成。

use wallplan_core::math::Point2;

/// 编辑器命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// 开始画墙（第一次点击）
    StartWall(Point2),
    /// 画墙预览（移动中，不变更图）
    PreviewWall(Point2),
    /// 完成当前墙段（第二次点击；终点随即成为下一段起点）
    FinishWall(Point2),
    /// 取消进行中的手势（Escape）
    Cancel,
    /// 开始画矩形（第一角）
    StartRect(Point2),
    /// 矩形预览
    PreviewRect(Point2),
    /// 完成矩形（对角）
    FinishRect(Point2),
    /// 在点附近选择墙体
    Select(Point2),
    /// 删除当前选中的墙
    DeleteSelected,
    /// 平移当前选中的墙
    MoveSelected { dx: f64, dy: f64 },
    /// 设置画墙厚度（同时作用于选中墙）
    SetThickness(f64),
    /// 设置捕捉半径
    SetSnapDistance(f64),
    Undo,
    Redo,
}

/// 命令执行结果
///
/// 一切非法输入（零长度、越界、空栈撤销、非正配置值）都按
/// 无操作处理并返回 `Ignored`，既不报错也不改动任何状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 墙体图已变更并写入了历史快照
    Committed,
    /// 仅瞬态状态（预览 / 选择 / 配置）发生变化
    Updated,
    /// 无效输入，作为无操作忽略
    Ignored,
}
