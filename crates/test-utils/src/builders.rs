#![allow(dead_code)]

use procharness::CommandSpec;

/// Builder for `sh -c` commands used as test children.
///
/// Steps run in the order they were added; the script ends with `exit <code>`.
pub struct ShellScript {
    steps: Vec<String>,
    exit_code: i32,
}

impl ShellScript {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            exit_code: 0,
        }
    }

    /// `printf '%s' <text>` to stdout.
    pub fn stdout(mut self, text: &str) -> Self {
        self.steps.push(format!("printf '%s' {}", quote(text)));
        self
    }

    /// `printf '%s' <text>` to stderr.
    pub fn stderr(mut self, text: &str) -> Self {
        self.steps.push(format!("printf '%s' {} >&2", quote(text)));
        self
    }

    /// `len` zero bytes to stdout.
    pub fn stdout_zeros(mut self, len: usize) -> Self {
        self.steps.push(format!("head -c {len} /dev/zero"));
        self
    }

    /// `len` zero bytes to stderr.
    pub fn stderr_zeros(mut self, len: usize) -> Self {
        self.steps.push(format!("head -c {len} /dev/zero >&2"));
        self
    }

    /// `count` lines alternating between stdout (`out<i>`) and stderr
    /// (`err<i>`).
    pub fn interleaved_lines(mut self, count: usize) -> Self {
        self.steps.push(format!(
            "i=1; while [ $i -le {count} ]; do echo out$i; echo err$i >&2; i=$((i+1)); done"
        ));
        self
    }

    /// Copy a file to stdout.
    pub fn cat(mut self, path: &std::path::Path) -> Self {
        self.steps
            .push(format!("cat {}", quote(&path.to_string_lossy())));
        self
    }

    pub fn sleep(mut self, secs: u32) -> Self {
        self.steps.push(format!("sleep {secs}"));
        self
    }

    pub fn exit(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn script(&self) -> String {
        let mut script = self.steps.join("; ");
        if !script.is_empty() {
            script.push_str("; ");
        }
        script.push_str(&format!("exit {}", self.exit_code));
        script
    }

    pub fn build(self) -> CommandSpec {
        CommandSpec::new("sh").arg("-c").arg(self.script())
    }
}

impl Default for ShellScript {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-quote for `sh`.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Expected stdout/stderr of [`ShellScript::interleaved_lines`].
pub fn interleaved_expectation(count: usize) -> (String, String) {
    let mut out = String::new();
    let mut err = String::new();
    for i in 1..=count {
        out.push_str(&format!("out{i}\n"));
        err.push_str(&format!("err{i}\n"));
    }
    (out, err)
}
