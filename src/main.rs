use lsh::Interpreter;

fn main() -> anyhow::Result<()> {
    Interpreter::default().repl()
}
