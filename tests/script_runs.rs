use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::rc::Rc;

// For library-based tests
use very::runtime::data_structures::port::{Port, PortTable};
use very::runtime::error::ErrorKind;
use very::runtime::interpreter::CodeManagement;
use very::runtime::interpreter::context::Context;

// Helper to get absolute path from manifest dir
fn manifest_path(rel: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join(rel)
}

// Helper to run the interpreter binary with the given arguments and capture its output
fn run_binary(arguments: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_very"))
        .args(arguments)
        .output()
        .expect("Failed to run interpreter")
}

fn run_script(script: &str) -> Output {
    let path = manifest_path(script);
    run_binary(&[path.to_str().unwrap()])
}

/// Shared buffer standing in for standard output in library runs.
#[derive(Clone, Default)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_hello_script() {
    let output = run_script("tests/scripts/hello.very");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hi!\n");
}

#[test]
fn test_factorial_script() {
    let output = run_script("tests/scripts/factorial.very");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "120\n3628800\n( 1 2 1 2 1 2 )\n( 111 107 )\n"
    );
}

#[test]
fn test_byte_order_mark_is_ignored() {
    let output = run_script("tests/scripts/bom.very");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
}

#[test]
fn test_undefined_symbol_exits_with_failure() {
    let output = run_script("tests/scripts/undefined.very");
    let errors = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(errors.contains("Error: "), "Missing error prefix in: {}", errors);
    assert!(
        errors.contains("undefined.very (2, 1): Use of undefined symbol \"missing\"."),
        "Unexpected error: {}",
        errors
    );
}

#[test]
fn test_redefinition_exits_with_failure() {
    let output = run_script("tests/scripts/redefine.very");
    let errors = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(errors.contains("Redefinition of symbol \"one\"."), "Unexpected error: {}", errors);
}

#[test]
fn test_invalid_command_lines() {
    for arguments in [&[][..], &["a.very", "b.very"][..]] {
        let output = run_binary(arguments);
        let errors = String::from_utf8_lossy(&output.stderr);

        assert_eq!(output.status.code(), Some(1));
        assert!(errors.contains("Error: Invalid command line."), "Unexpected error: {}", errors);
    }
}

#[test]
fn test_missing_file_exits_with_failure() {
    let output = run_binary(&["tests/scripts/does-not-exist.very"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not open source file"));
}

#[test]
fn test_factorial_script_lib() {
    let output = Capture::default();
    let ports = PortTable::new(vec![
        Port::Input(Box::new(io::empty())),
        Port::Output(Box::new(output.clone())),
        Port::Output(Box::new(io::sink())),
    ]);
    let mut context = Context::with_ports(ports);

    let path = manifest_path("tests/scripts/factorial.very");
    let result = context.process_source_file(path.to_str().unwrap());

    assert!(result.is_ok(), "Script failed: {:?}", result.err());
    assert_eq!(
        String::from_utf8_lossy(&output.0.borrow()),
        "120\n3628800\n( 1 2 1 2 1 2 )\n( 111 107 )\n"
    );
}

#[test]
fn test_partial_output_is_flushed_before_an_error() {
    let output = Capture::default();
    let ports = PortTable::new(vec![
        Port::Input(Box::new(io::empty())),
        Port::Output(Box::new(io::BufWriter::new(output.clone()))),
    ]);
    let mut context = Context::with_ports(ports);

    let error = context
        .process_source("<test>", "1 write 2 0 /")
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ArithmeticPolicy);
    assert_eq!(String::from_utf8_lossy(&output.0.borrow()), "1\n");
}
