//! # Clock 模块
//!
//! 虚拟时钟上的定时器队列。
//!
//! 引擎从不读取真实时间：宿主通过 `advance(elapsed_ms)` 推进时钟，
//! 所有定时器都只是虚拟时钟上的一个到期时间。

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// 定时器 id（单调递增，永不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// 定时器队列
///
/// 同一时刻到期的定时器按创建顺序触发。
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    /// (到期时间, id) → 负载
    queue: BTreeMap<(u64, TimerId), T>,
    /// id → 到期时间（用于按 id 取消）
    index: HashMap<TimerId, u64>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            index: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `due` 时刻安排一个定时器
    pub fn arm(&mut self, due: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((due, id), payload);
        self.index.insert(id, due);
        id
    }

    /// 取消定时器
    ///
    /// 幂等：取消不存在或已触发的定时器返回 `None`。
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let due = self.index.remove(&id)?;
        self.queue.remove(&(due, id))
    }

    /// 定时器的到期时间
    pub fn due_of(&self, id: TimerId) -> Option<u64> {
        self.index.get(&id).copied()
    }

    /// 最早的到期时间
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// 弹出一个在 `now` 之前（含）到期的定时器
    pub fn pop_due(&mut self, now: u64) -> Option<(u64, TimerId, T)> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        let payload = self.queue.remove(&(due, id))?;
        self.index.remove(&id);
        Some((due, id, payload))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.index.clear();
    }
}
