//! 事务栈（TransactionStack）
//!
//! 栈深度即当前事务嵌套深度，每层一个 `TransactionFrame`，按 FIFO 累积被延迟的调度记录。
//! 只有栈顶帧可以追加或弹出；栈为空时的提交/回滚为无操作。
//!
use crate::error::{EventError, EventResult};
use crate::event::{EventRef, Payload};
use uuid::Uuid;

/// 被延迟的一次调度
#[derive(Clone, Debug)]
pub struct QueuedDispatch {
    pub event: EventRef,
    pub payload: Payload,
}

impl QueuedDispatch {
    pub fn new(event: EventRef, payload: Payload) -> Self {
        Self { event, payload }
    }
}

/// 单层事务帧
#[derive(Debug)]
pub struct TransactionFrame {
    id: Uuid,
    records: Vec<QueuedDispatch>,
}

impl TransactionFrame {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            records: Vec::new(),
        }
    }

    /// 帧标识，仅用于日志关联
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<QueuedDispatch> {
        self.records
    }
}

#[derive(Debug, Default)]
pub struct TransactionStack {
    frames: Vec<TransactionFrame>,
}

impl TransactionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开启一层事务，返回新帧标识
    pub fn begin(&mut self) -> Uuid {
        let frame = TransactionFrame::new();
        let id = frame.id;
        self.frames.push(frame);
        id
    }

    /// 弹出栈顶帧并交还给调用方重放；栈为空时返回 `None`
    ///
    /// 必须先弹出再重放：重放期间再次被延迟的事件应落入父帧，而不是正在冲刷的帧。
    pub fn commit(&mut self) -> Option<TransactionFrame> {
        self.frames.pop()
    }

    /// 弹出并丢弃栈顶帧；栈为空时返回 `None`
    pub fn rollback(&mut self) -> Option<TransactionFrame> {
        self.frames.pop()
    }

    pub fn is_open(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 追加到栈顶帧；无开启事务时为使用错误
    pub fn enqueue(&mut self, record: QueuedDispatch) -> EventResult<()> {
        let frame = self
            .frames
            .last_mut()
            .ok_or(EventError::NoOpenTransaction)?;
        frame.records.push(record);
        Ok(())
    }

    /// 栈顶帧当前累积的记录数
    pub fn pending(&self) -> usize {
        self.frames.last().map(TransactionFrame::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record(name: &str) -> QueuedDispatch {
        QueuedDispatch::new(EventRef::from(name), Value::Null)
    }

    fn names(frame: TransactionFrame) -> Vec<String> {
        frame
            .into_records()
            .into_iter()
            .map(|r| r.event.name().to_string())
            .collect()
    }

    #[test]
    fn empty_pop_is_noop() {
        let mut stack = TransactionStack::new();
        assert!(stack.commit().is_none());
        assert!(stack.rollback().is_none());
        assert!(!stack.is_open());
        assert_eq!(stack.depth(), 0);

        stack.begin();
        let frame = stack.commit().unwrap();
        assert!(frame.is_empty());
        assert!(frame.into_records().is_empty());
    }

    #[test]
    fn enqueue_without_transaction_is_usage_error() {
        let mut stack = TransactionStack::new();
        let err = stack.enqueue(record("a")).unwrap_err();
        assert!(matches!(err, EventError::NoOpenTransaction));
    }

    #[test]
    fn commit_returns_records_in_fifo_order() {
        let mut stack = TransactionStack::new();
        stack.begin();
        stack.enqueue(record("a")).unwrap();
        stack
            .enqueue(QueuedDispatch::new(EventRef::from("b"), json!({"k": 1})))
            .unwrap();
        stack.enqueue(record("c")).unwrap();
        assert_eq!(stack.pending(), 3);

        let frame = stack.commit().unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(names(frame), vec!["a", "b", "c"]);
        assert!(!stack.is_open());
    }

    #[test]
    fn only_top_frame_is_touched() {
        let mut stack = TransactionStack::new();
        let outer = stack.begin();
        stack.enqueue(record("outer")).unwrap();
        let inner = stack.begin();
        assert_ne!(outer, inner);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pending(), 0);

        stack.enqueue(record("inner")).unwrap();
        let dropped = stack.rollback().unwrap();
        assert_eq!(dropped.id(), inner);
        assert_eq!(names(dropped), vec!["inner"]);

        let kept = stack.commit().unwrap();
        assert_eq!(kept.id(), outer);
        assert_eq!(names(kept), vec!["outer"]);
    }
}
