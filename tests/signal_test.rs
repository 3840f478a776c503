/*!
 * Interactive Signal Tests
 * Scripted display transitions observed mid-dispatch
 */

use marrow_iosched::{InteractiveSignal, ManualClock, MarrowScheduler, Request, TunableKey};
use mockall::mock;
use pretty_assertions::assert_eq;

mock! {
    pub Signal {}
    impl InteractiveSignal for Signal {
        fn is_interactive(&self) -> bool;
    }
}

/// Signal that answers from `script` in order
fn scripted(script: Vec<bool>) -> MockSignal {
    let calls = script.len();
    let mut answers = script.into_iter();
    let mut signal = MockSignal::new();
    signal
        .expect_is_interactive()
        .times(calls)
        .returning(move || answers.next().unwrap_or(true));
    signal
}

#[test]
fn test_display_off_sweep_prefers_async_write() {
    // init, three admissions, first dispatch's normal selection,
    // second dispatch's eligibility check, then the sweep itself
    let signal = scripted(vec![true, true, true, true, true, true, false]);
    let clock = ManualClock::new();
    let mut sched = MarrowScheduler::init(signal, clock.clone()).unwrap();
    sched.tunables_mut().set(TunableKey::FifoBatch, 1);
    sched.tunables_mut().set(TunableKey::AsyncWriteExpire, 4);
    sched.tunables_mut().set(TunableKey::SyncWriteExpire, 4);

    sched.admit(Request::write(1, false));
    sched.admit(Request::write(2, true));
    sched.admit(Request::read(3, true));
    clock.advance_ms(1_000);

    assert_eq!(sched.dispatch().unwrap().id.0, 3);
    assert_eq!(sched.batch_count(), 1);

    // Both writes are overdue; the display-off sweep order picks async first
    assert_eq!(sched.dispatch().unwrap().id.0, 1);
    assert_eq!(sched.batch_count(), 0);
}

#[test]
fn test_display_on_sweep_prefers_sync_write() {
    let signal = scripted(vec![true; 7]);
    let clock = ManualClock::new();
    let mut sched = MarrowScheduler::init(signal, clock.clone()).unwrap();
    sched.tunables_mut().set(TunableKey::FifoBatch, 1);
    sched.tunables_mut().set(TunableKey::AsyncWriteExpire, 4);
    sched.tunables_mut().set(TunableKey::SyncWriteExpire, 4);

    sched.admit(Request::write(1, false));
    sched.admit(Request::write(2, true));
    sched.admit(Request::read(3, true));
    clock.advance_ms(1_000);

    assert_eq!(sched.dispatch().unwrap().id.0, 3);
    assert_eq!(sched.dispatch().unwrap().id.0, 2);
    assert_eq!(sched.batch_count(), 0);
}

#[test]
fn test_no_sweep_while_display_off() {
    // init, two admissions, first dispatch's normal selection, then the
    // second dispatch's eligibility check and normal selection
    let signal = scripted(vec![true, true, true, true, false, false]);
    let clock = ManualClock::new();
    let mut sched = MarrowScheduler::init(signal, clock.clone()).unwrap();
    sched.tunables_mut().set(TunableKey::FifoBatch, 1);
    sched.tunables_mut().set(TunableKey::SyncWriteExpire, 4);

    sched.admit(Request::read(1, true));
    sched.admit(Request::write(2, true));
    clock.advance_ms(1_000);

    assert_eq!(sched.dispatch().unwrap().id.0, 1);
    assert_eq!(sched.batch_count(), 1);

    // The overdue write still comes out, but through normal selection
    assert_eq!(sched.dispatch().unwrap().id.0, 2);
    assert_eq!(sched.batch_count(), 2);
    assert_eq!(sched.stats().expired_dispatches, 0);
}
