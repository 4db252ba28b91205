use keel_interpreter::builtins::global_environment;
use keel_interpreter::{program, Environment};
use std::env;
use std::time::Instant;

static FIBONACCI: &str = "fn fibonacci(x)
  if (x < 2) then
    return x;
  end if
  return fibonacci(x - 1) + fibonacci(x - 2);
end fn";

fn main() -> anyhow::Result<()> {
    let n: i32 = match env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 25,
    };

    let root = global_environment(None)?;
    let env = Environment::with_enclosed(&root);
    program::run(FIBONACCI, &env)?;

    let call = format!("fibonacci({});", n);
    let start = Instant::now();
    let result = program::run(&call, &env)?;
    let duration = start.elapsed();

    println!(
        "engine=tree-walker, result={}, duration={}",
        result,
        duration.as_secs_f64(),
    );

    Ok(())
}
