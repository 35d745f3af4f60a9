//! 编辑器会话
//!
//! 显式的会话上下文对象：持有墙体图、捕捉配置、历史栈、选择与
//! 手势状态，不依赖任何全局可变量，支持并存多个互不干扰的会话。
//!
//! 命令处理管线固定为：
//! 变更图 → 去重 → 重算派生状态（闭合空间 / 转角补块）→ 提交快照。
//! 快照只在一次用户编辑完成时提交（成墙、矩形落定、删除、平移、
//! 改厚度、撤销重做恢复），预览拖动期间绝不提交。

use crate::command::{Command, CommandOutcome};
use crate::frame::{LengthLabel, Preview, RenderFrame};
use tracing::{debug, info};
use wallplan_core::corners::{fill_corners, CornerPatch};
use wallplan_core::geometry::{is_within_boundary, orthogonal_project, round_point};
use wallplan_core::history::{History, Snapshot};
use wallplan_core::intersect::{apply_plan, plan_insertion};
use wallplan_core::math::Point2;
use wallplan_core::snap::{self, SnapConfig, SnapMode};
use wallplan_core::spaces::{detect_closed_spaces, ClosedSpace};
use wallplan_core::wall::{WallGraph, WallId};

/// 默认画墙厚度（毫米）
const DEFAULT_WALL_THICKNESS: f64 = 100.0;

/// 进行中的绘制手势
#[derive(Debug, Clone, Copy, PartialEq)]
enum GestureState {
    Idle,
    /// 画墙中：起点已定，等待终点（成墙后终点接续为新起点）
    DrawingWall { start: Point2 },
    /// 画矩形中：第一角已定，等待对角
    DrawingRect { start: Point2 },
}

/// 编辑器会话
pub struct EditorSession {
    graph: WallGraph,
    history: History,
    snap_config: SnapConfig,
    wall_thickness: f64,
    selected: Option<WallId>,
    gesture: GestureState,
    preview: Option<Preview>,
    spaces: Vec<ClosedSpace>,
    corners: Vec<CornerPatch>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        let mut session = Self {
            graph: WallGraph::new(),
            history: History::new(),
            snap_config: SnapConfig::default(),
            wall_thickness: DEFAULT_WALL_THICKNESS,
            selected: None,
            gesture: GestureState::Idle,
            preview: None,
            spaces: Vec::new(),
            corners: Vec::new(),
        };
        // 初始空快照垫底，撤销链可以一路回到空图
        session.commit_snapshot();
        session
    }

    /// 执行一条命令
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::StartWall(p) => self.start_wall(p),
            Command::PreviewWall(p) => self.preview_wall(p),
            Command::FinishWall(p) => self.finish_wall(p),
            Command::Cancel => self.cancel(),
            Command::StartRect(p) => self.start_rect(p),
            Command::PreviewRect(p) => self.preview_rect(p),
            Command::FinishRect(p) => self.finish_rect(p),
            Command::Select(p) => self.select(p),
            Command::DeleteSelected => self.delete_selected(),
            Command::MoveSelected { dx, dy } => self.move_selected(dx, dy),
            Command::SetThickness(v) => self.set_thickness(v),
            Command::SetSnapDistance(v) => self.set_snap_distance(v),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
        }
    }

    // ========== 画墙 ==========

    pub fn start_wall(&mut self, point: Point2) -> CommandOutcome {
        if !is_within_boundary(point) {
            return CommandOutcome::Ignored;
        }
        let start = snap::resolve(
            point,
            self.graph.walls(),
            &self.snap_config,
            SnapMode::WallStart,
        )
        .point;
        self.gesture = GestureState::DrawingWall { start };
        self.preview = Some(Preview::Wall {
            start,
            end: start,
            label: LengthLabel::between(start, start),
        });
        CommandOutcome::Updated
    }

    pub fn preview_wall(&mut self, point: Point2) -> CommandOutcome {
        let GestureState::DrawingWall { start } = self.gesture else {
            return CommandOutcome::Ignored;
        };
        if !is_within_boundary(point) {
            return CommandOutcome::Ignored;
        }
        let end = self.resolve_wall_end(start, point);
        self.preview = Some(Preview::Wall {
            start,
            end,
            label: LengthLabel::between(start, end),
        });
        CommandOutcome::Updated
    }

    pub fn finish_wall(&mut self, point: Point2) -> CommandOutcome {
        let GestureState::DrawingWall { start } = self.gesture else {
            return CommandOutcome::Ignored;
        };
        if !is_within_boundary(point) {
            return CommandOutcome::Ignored;
        }
        let end = self.resolve_wall_end(start, point);

        let plan = plan_insertion(&self.graph, start, end, self.wall_thickness);
        if plan.is_empty() {
            return CommandOutcome::Ignored;
        }
        apply_plan(&mut self.graph, plan);
        self.after_mutation();
        info!(walls = self.graph.len(), "finished wall segment");

        // 连续绘制：本段终点接续为下一段起点
        self.gesture = GestureState::DrawingWall { start: end };
        self.preview = Some(Preview::Wall {
            start: end,
            end,
            label: LengthLabel::between(end, end),
        });
        CommandOutcome::Committed
    }

    /// 终点推导：正交约束 → 一般捕捉 → 重新正交化
    ///
    /// 捕捉可能把点拉离轴线，因此吸附之后要再投影一次。
    fn resolve_wall_end(&self, start: Point2, cursor: Point2) -> Point2 {
        let ortho = orthogonal_project(start, cursor);
        let snapped = snap::resolve(
            ortho,
            self.graph.walls(),
            &self.snap_config,
            SnapMode::General,
        )
        .point;
        orthogonal_project(start, snapped)
    }

    // ========== 画矩形 ==========

    pub fn start_rect(&mut self, point: Point2) -> CommandOutcome {
        if !is_within_boundary(point) {
            return CommandOutcome::Ignored;
        }
        let start = snap::resolve(
            point,
            self.graph.walls(),
            &self.snap_config,
            SnapMode::WallStart,
        )
        .point;
        self.gesture = GestureState::DrawingRect { start };
        self.preview = Some(Self::rect_preview(start, start));
        CommandOutcome::Updated
    }

    pub fn preview_rect(&mut self, point: Point2) -> CommandOutcome {
        let GestureState::DrawingRect { start } = self.gesture else {
            return CommandOutcome::Ignored;
        };
        if !is_within_boundary(point) {
            return CommandOutcome::Ignored;
        }
        let end = snap::resolve(
            point,
            self.graph.walls(),
            &self.snap_config,
            SnapMode::WallStart,
        )
        .point;
        self.preview = Some(Self::rect_preview(start, end));
        CommandOutcome::Updated
    }

    pub fn finish_rect(&mut self, point: Point2) -> CommandOutcome {
        let GestureState::DrawingRect { start } = self.gesture else {
            return CommandOutcome::Ignored;
        };
        if !is_within_boundary(point) {
            return CommandOutcome::Ignored;
        }
        let end = snap::resolve(
            point,
            self.graph.walls(),
            &self.snap_config,
            SnapMode::WallStart,
        )
        .point;

        // 四条边按上右下左依次走完整的交点分割流程；
        // 退化的边（对角共线时）产出空计划，自然跳过
        let mut mutated = false;
        for (a, b) in Self::rect_edges(start, end) {
            let plan = plan_insertion(&self.graph, a, b, self.wall_thickness);
            if !plan.is_empty() {
                apply_plan(&mut self.graph, plan);
                mutated = true;
            }
        }
        self.gesture = GestureState::Idle;
        self.preview = None;
        if !mutated {
            return CommandOutcome::Ignored;
        }
        self.after_mutation();
        info!(walls = self.graph.len(), "finished rectangle");
        CommandOutcome::Committed
    }

    /// 对角两点展开为上、右、下、左四条边
    fn rect_edges(a: Point2, b: Point2) -> [(Point2, Point2); 4] {
        let (x1, y1, x2, y2) = (a.x, a.y, b.x, b.y);
        [
            (Point2::new(x1, y1), Point2::new(x2, y1)),
            (Point2::new(x2, y1), Point2::new(x2, y2)),
            (Point2::new(x2, y2), Point2::new(x1, y2)),
            (Point2::new(x1, y2), Point2::new(x1, y1)),
        ]
    }

    fn rect_preview(start: Point2, end: Point2) -> Preview {
        let width = (end.x - start.x).abs();
        let height = (end.y - start.y).abs();
        Preview::Rect {
            edges: Self::rect_edges(start, end),
            width_label: LengthLabel::at(
                format!("{}", width.round() as i64),
                Point2::new((start.x + end.x) / 2.0, start.y.min(end.y) - 100.0),
            ),
            height_label: LengthLabel::at(
                format!("{}", height.round() as i64),
                Point2::new(start.x.max(end.x) + 100.0, (start.y + end.y) / 2.0),
            ),
        }
    }

    // ========== 手势取消 ==========

    /// 丢弃进行中的手势与预览；已提交的图和历史不受影响
    pub fn cancel(&mut self) -> CommandOutcome {
        if self.gesture == GestureState::Idle && self.preview.is_none() {
            return CommandOutcome::Ignored;
        }
        self.gesture = GestureState::Idle;
        self.preview = None;
        CommandOutcome::Updated
    }

    // ========== 选择与编辑 ==========

    pub fn select(&mut self, point: Point2) -> CommandOutcome {
        self.selected = self
            .graph
            .find_nearest(point, self.snap_config.snap_distance);
        debug!(selected = ?self.selected, "selection changed");
        CommandOutcome::Updated
    }

    pub fn delete_selected(&mut self) -> CommandOutcome {
        let Some(id) = self.selected.take() else {
            return CommandOutcome::Ignored;
        };
        if !self.graph.remove_wall(id) {
            return CommandOutcome::Ignored;
        }
        self.after_mutation();
        info!(walls = self.graph.len(), "deleted wall");
        CommandOutcome::Committed
    }

    pub fn move_selected(&mut self, dx: f64, dy: f64) -> CommandOutcome {
        let Some(id) = self.selected else {
            return CommandOutcome::Ignored;
        };
        let Some(wall) = self.graph.get(id) else {
            return CommandOutcome::Ignored;
        };
        let start = round_point(Point2::new(wall.start.x + dx, wall.start.y + dy));
        let end = round_point(Point2::new(wall.end.x + dx, wall.end.y + dy));
        // 取整后无位移，或任一端点越界：无操作
        if start == wall.start && end == wall.end {
            return CommandOutcome::Ignored;
        }
        if !is_within_boundary(start) || !is_within_boundary(end) {
            return CommandOutcome::Ignored;
        }

        self.graph.translate_wall(id, dx, dy);
        self.graph.dedup();
        // 平移后与既有墙重合时本体可能被去重移除
        if self.graph.get(id).is_none() {
            self.selected = None;
        }
        self.after_mutation();
        CommandOutcome::Committed
    }

    // ========== 配置 ==========

    pub fn set_thickness(&mut self, value: f64) -> CommandOutcome {
        let Some(value) = validate_positive_mm(value) else {
            return CommandOutcome::Ignored;
        };
        self.wall_thickness = value;
        // 有选中墙时同步改写它的厚度，作为一次可撤销的编辑
        if let Some(id) = self.selected {
            if self.graph.set_thickness(id, value) {
                self.after_mutation();
                return CommandOutcome::Committed;
            }
        }
        CommandOutcome::Updated
    }

    pub fn set_snap_distance(&mut self, value: f64) -> CommandOutcome {
        let Some(value) = validate_positive_mm(value) else {
            return CommandOutcome::Ignored;
        };
        self.snap_config.snap_distance = value;
        CommandOutcome::Updated
    }

    // ========== 撤销 / 重做 ==========

    pub fn undo(&mut self) -> CommandOutcome {
        match self.history.undo() {
            Ok(Some(snapshot)) => {
                self.restore(&snapshot);
                info!(walls = self.graph.len(), "undo");
                CommandOutcome::Committed
            }
            Ok(None) => CommandOutcome::Ignored,
            Err(error) => {
                tracing::error!(%error, "undo failed, keeping current state");
                CommandOutcome::Ignored
            }
        }
    }

    pub fn redo(&mut self) -> CommandOutcome {
        match self.history.redo() {
            Ok(Some(snapshot)) => {
                self.restore(&snapshot);
                info!(walls = self.graph.len(), "redo");
                CommandOutcome::Committed
            }
            Ok(None) => CommandOutcome::Ignored,
            Err(error) => {
                tracing::error!(%error, "redo failed, keeping current state");
                CommandOutcome::Ignored
            }
        }
    }

    /// 从快照整体恢复：清空重建墙体，丢弃瞬态状态，重算派生数据
    fn restore(&mut self, snapshot: &Snapshot) {
        snapshot.restore_into(&mut self.graph);
        self.selected = None;
        self.gesture = GestureState::Idle;
        self.preview = None;
        self.recompute_derived();
    }

    // ========== 派生状态与快照 ==========

    fn recompute_derived(&mut self) {
        self.spaces = detect_closed_spaces(&self.graph);
        self.corners = fill_corners(&self.graph);
    }

    /// 变更收尾：重算派生状态并提交快照
    fn after_mutation(&mut self) {
        self.recompute_derived();
        self.commit_snapshot();
    }

    fn commit_snapshot(&mut self) {
        // 快照内容完全来自内部状态，编码失败不应发生；
        // 万一发生只记录日志并保持当前图，不中断编辑
        if let Err(error) = self.history.commit(&Snapshot::capture(&self.graph)) {
            tracing::error!(%error, "failed to commit history snapshot");
        }
    }

    // ========== 只读访问 ==========

    /// 当前渲染帧（渲染契约）
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            walls: self.graph.walls().to_vec(),
            spaces: self.spaces.clone(),
            corners: self.corners.clone(),
            labels: self
                .graph
                .walls()
                .iter()
                .map(|w| LengthLabel::between(w.start, w.end))
                .collect(),
            key_points: self
                .graph
                .vertex_keys()
                .into_iter()
                .map(|k| k.to_point())
                .collect(),
            preview: self.preview.clone(),
            selected: self.selected,
        }
    }

    pub fn graph(&self) -> &WallGraph {
        &self.graph
    }

    pub fn spaces(&self) -> &[ClosedSpace] {
        &self.spaces
    }

    pub fn corners(&self) -> &[CornerPatch] {
        &self.corners
    }

    pub fn selected(&self) -> Option<WallId> {
        self.selected
    }

    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    pub fn snap_distance(&self) -> f64 {
        self.snap_config.snap_distance
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

/// 正整数毫米校验：非法输入返回 `None`（调用方静默忽略）
fn validate_positive_mm(value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round();
    (rounded >= 1.0).then_some(rounded)
}
