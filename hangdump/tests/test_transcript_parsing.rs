use hangdump::domain::{ParseError, ThreadId};
use hangdump::input::read_transcript;
use hangdump::transcript::parser::NO_MANAGED_STACK_FRAME;
use hangdump::transcript::Transcript;
use std::path::Path;

fn load(name: &str) -> Transcript {
    let path = format!("tests/fixtures/{name}");
    let lines = read_transcript(Some(Path::new(&path))).unwrap();
    Transcript::parse(&lines).unwrap()
}

fn ids(stacks: &[hangdump::transcript::CallStack]) -> Vec<i64> {
    stacks.iter().map(|s| s.id().0).collect()
}

#[test]
fn test_parse_all_three_sections() {
    let transcript = load("hang_gc.txt");

    assert_eq!(ids(&transcript.native_stacks), [0, 1, 2, 14]);
    assert_eq!(transcript.dotnet_threads.len(), 4);
    assert_eq!(ids(&transcript.dotnet_stacks), [0, 1, 2, 14]);
}

#[test]
fn test_native_frames_stay_within_their_stack() {
    let transcript = load("hang_gc.txt");

    // Header line plus five frames, nothing from thread 1
    let main_thread = &transcript.native_stacks[0];
    assert_eq!(main_thread.frames().len(), 6);
    assert!(main_thread.frames()[0].contains("RetAddr"));
    assert!(!main_thread.matches("gc_thread_stub"));

    let gc_thread = &transcript.native_stacks[1];
    assert_eq!(gc_thread.frames().len(), 4);
    assert!(gc_thread.matches("gc_thread_stub"));
}

#[test]
fn test_thread_table_flags() {
    let transcript = load("hang_gc.txt");
    let threads = &transcript.dotnet_threads;

    let ids: Vec<_> = threads.iter().map(|t| t.id).collect();
    assert_eq!(ids, [ThreadId(0), ThreadId(2), ThreadId(14), ThreadId(15)]);

    assert!(threads[1].is_finalizer_thread);
    assert!(threads[0].gc_enabled && threads[1].gc_enabled);
    assert!(!threads[2].gc_enabled && !threads[3].gc_enabled);
    assert!(threads[3].has_exception);
    assert!(threads.iter().all(|t| !t.is_gc_thread));
}

#[test]
fn test_unwalkable_managed_stacks_get_synthetic_frame() {
    let transcript = load("hang_gc.txt");

    // "Unable to walk" spans three lines, the next header is still found
    assert_eq!(transcript.dotnet_stacks[1].frames(), [NO_MANAGED_STACK_FRAME]);
    assert_eq!(transcript.dotnet_stacks[2].frames(), [NO_MANAGED_STACK_FRAME]);
    assert_eq!(transcript.dotnet_stacks[3].frames().len(), 3);
}

#[test]
fn test_native_only_transcript() {
    let transcript = load("native_only.txt");

    assert_eq!(ids(&transcript.native_stacks), [1234]);
    assert!(transcript.dotnet_threads.is_empty());
    assert!(transcript.dotnet_stacks.is_empty());
}

#[test]
fn test_native_stack_ending_at_section_marker() {
    let transcript = load("locks.txt");

    let finalizer = transcript.native_stacks.last().unwrap();
    assert_eq!(finalizer.id(), ThreadId(9));
    assert!(finalizer.frames().iter().all(|f| !f.contains("MANAGED")));
    assert_eq!(transcript.dotnet_threads.len(), 2);
}

#[test]
fn test_malformed_row_aborts_parse() {
    let lines = read_transcript(Some(Path::new("tests/fixtures/malformed.txt"))).unwrap();
    let err = Transcript::parse(&lines).unwrap_err();

    assert!(matches!(err, ParseError::MalformedThreadIdentifier { line: 7, .. }));
}

#[test]
fn test_unable_to_walk_skips_lines_regardless_of_content() {
    let lines = [
        "MANAGED THREADS",
        "MANAGED CALLSTACKS",
        "OS Thread Id: 0x10 (3)",
        "Unable to walk the managed stack.",
        "OS Thread Id: 0x11 (4)",
        "System.Threading.WaitHandle.WaitOne()",
        "after skip",
    ];
    let transcript = Transcript::parse(&lines).unwrap();

    // The swallowed header never starts a stack of its own
    assert_eq!(ids(&transcript.dotnet_stacks), [3]);
    assert_eq!(transcript.dotnet_stacks[0].frames(), [NO_MANAGED_STACK_FRAME, "after skip"]);
}

#[test]
fn test_managed_stacks_ignored_without_thread_section() {
    let lines = ["MANAGED CALLSTACKS", "OS Thread Id: 0x10 (3)", "frame"];
    let transcript = Transcript::parse(&lines).unwrap();
    assert!(transcript.is_empty());
}
