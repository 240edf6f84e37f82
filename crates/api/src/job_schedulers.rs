use crate::{reminder::send_due_reminders::SendDueRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::{interval, sleep_until, Instant};
use salon_scheduler_infra::SalonContext;
use std::time::Duration;
use tracing::info;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Sends the due reminders at the start of every minute
pub fn start_send_reminders_job(ctx: SalonContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);

        sleep_until(start).await;
        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;
            let context = ctx.clone();
            actix_web::rt::spawn(send_reminders(context));
        }
    });
}

async fn send_reminders(context: SalonContext) {
    let usecase = SendDueRemindersUseCase {};
    if let Ok(res) = execute(usecase, &context).await {
        if res.sent + res.failed + res.skipped > 0 {
            info!(
                "Reminders sent: {}, failed: {}, skipped: {}",
                res.sent, res.failed, res.skipped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 5), 5);
        assert_eq!(get_start_delay(50 * 1000, 10), 60);
        assert_eq!(get_start_delay(50 * 1000, 15), 55);
        assert_eq!(get_start_delay(60 * 1000, 60), 60);
        assert_eq!(get_start_delay(60 * 1000, 10), 50);
        assert_eq!(get_start_delay(59 * 1000, 0), 1);
        assert_eq!(get_start_delay(59 * 1000, 1), 60);
    }
}
