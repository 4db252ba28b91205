use crate::environment::Environment;
use crate::program;
use std::io::{self, Write};
use std::iter;

static PROMPT: &str = "> ";

/// Reads from stdin a line at a time, so natives like `in` can share it.
pub fn start(env: &Environment) -> io::Result<()> {
    let lines = iter::from_fn(|| {
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(err) => Some(Err(err)),
        }
    });

    run(lines, io::stdout(), env)
}

/// Evaluates each submitted line in a new child of the previous line's scope, so earlier
/// bindings stay visible and may be redeclared.
pub fn run<I, W>(lines: I, mut output: W, env: &Environment) -> io::Result<()>
where
    I: IntoIterator<Item = io::Result<String>>,
    W: Write,
{
    let mut env = env.clone();

    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line == "exit" {
            break;
        }

        if !line.is_empty() {
            env = Environment::with_enclosed(&env);
            match program::run(line, &env) {
                Ok(value) => writeln!(output, "{}", value)?,
                Err(err) => writeln!(output, "ERROR: {}", err)?,
            }
        }

        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    Ok(())
}
