//! End-to-end coverage of the server binary: spawn it against a temp
//! socket and data directory, drive it with raw wire-protocol frames (the
//! client's framing, reimplemented minimally here since this test plays
//! the client's role), and confirm scenario S1 from the specification.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin;
use tempfile::tempdir;

struct ServerProcess {
    child: Child,
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn wait_for_socket(path: &std::path::Path) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if path.exists() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server never created its socket at {path:?}");
}

fn send_statement(stream: &mut UnixStream, statement: &str) -> Vec<u8> {
    let payload = statement.as_bytes();
    let mut header = [0u8; 5];
    header[0] = 1; // OK_WAIT_FOR_RESPONSE; ignored by the server on the way in
    header[1..5].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    stream.write_all(&header).unwrap();
    stream.write_all(payload).unwrap();
    stream.flush().unwrap();

    let mut response_header = [0u8; 5];
    stream.read_exact(&mut response_header).unwrap();
    let length = u32::from_le_bytes(response_header[1..5].try_into().unwrap()) as usize;
    let mut body = vec![0u8; length];
    stream.read_exact(&mut body).unwrap();
    body
}

#[test]
fn scenario_s1_over_the_real_socket() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("columndb.sock");
    let data_dir = dir.path().join("data");

    let child = Command::new(cargo_bin("columndb-server"))
        .arg("--socket")
        .arg(&socket_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let mut server = ServerProcess { child };

    wait_for_socket(&socket_path);
    let mut stream = UnixStream::connect(&socket_path).unwrap();

    for statement in [
        "create(db,\"d1\")",
        "create(tbl,\"t1\",d1,2)",
        "create(col,\"a\",d1.t1)",
        "create(col,\"b\",d1.t1)",
        "relational_insert(d1.t1,10,100)",
        "relational_insert(d1.t1,20,200)",
        "relational_insert(d1.t1,30,300)",
        "s=select(d1.t1.a,15,35)",
        "v=fetch(d1.t1.b,s)",
    ] {
        send_statement(&mut stream, statement);
    }

    let body = send_statement(&mut stream, "print(v)");
    assert_eq!(String::from_utf8(body).unwrap(), "200\n300\n");

    send_statement(&mut stream, "shutdown");

    server.child.wait().unwrap();
}
