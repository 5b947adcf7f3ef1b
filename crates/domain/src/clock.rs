//! # Clock（時刻プロバイダ）
//!
//! ユースケース層で `Utc::now()` を直接呼ばず、テストで時刻を固定できるようにする。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// システム時刻
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 手動で進められる時刻（テスト用）
///
/// 一覧の並び順（新しい順）を検証するため、呼び出し側で明示的に時刻を進める。
pub struct FixedClock {
   now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を進める
   pub fn advance(&self, by: Duration) {
      if let Ok(mut now) = self.now.lock() {
         *now += by;
      }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      match self.now.lock() {
         Ok(now) => *now,
         Err(poisoned) => *poisoned.into_inner(),
      }
   }
}
