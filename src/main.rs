use std::io;
use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use torus_life::config::Config;
use torus_life::driver::Driver;
use torus_life::driver::Flow;
use torus_life::io::convert_event;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    info!(?config, "Starting");

    let mut driver = Driver::new(config);
    driver.init();

    let mut stdout = io::stdout();

    // A panic would otherwise leave the shell in raw mode on the alternate screen
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        hook(info);
    }));

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    let res = execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)
        .context("Failed to enter the alternate screen")
        .and_then(|()| run(&mut driver, &mut stdout));

    finish(res, restore_terminal())
}

fn restore_terminal() -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let left = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)
        .context("Failed to leave the alternate screen");
    let raw = terminal::disable_raw_mode().context("Failed to disable raw mode");

    left.and(raw)
}

/// The loop's own error wins over a failed restore, which is only logged then.
fn finish(res: anyhow::Result<()>, restore: anyhow::Result<()>) -> anyhow::Result<()> {
    match (res, restore) {
        (Err(e), Err(restore)) => {
            error!("{restore:#}");
            Err(e)
        }
        (res, restore) => res.and(restore),
    }
}

fn run(driver: &mut Driver, stdout: &mut io::Stdout) -> anyhow::Result<()> {
    draw(driver, stdout)?;

    loop {
        let timeout = driver.timeout(Instant::now());

        // Wait for input for at most as long as the ticker allows
        let mut dirty = false;
        if event::poll(timeout).context("Failed to poll terminal events")? {
            let event = event::read().context("Failed to read terminal event")?;

            if let Some(event) = convert_event(event) {
                if driver.apply(event, Instant::now()) == Flow::Exit {
                    break;
                }

                dirty = true;
            }
        }

        dirty |= driver.on_timer(Instant::now());

        if dirty {
            draw(driver, stdout)?;
        }
    }

    Ok(())
}

fn draw(driver: &mut Driver, stdout: &mut io::Stdout) -> anyhow::Result<()> {
    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
    )?;

    for line in driver.frame().lines() {
        queue!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
    }

    queue!(
        stdout,
        style::Print(driver.status_line()),
        cursor::MoveToNextLine(1),
        style::Print("space start/stop  r randomize  c clear  hjkl pan  <size> enter resize  q quit"),
    )?;

    stdout.flush().context("Failed to draw frame")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::finish;

    #[test]
    fn loop_error_survives_a_failed_restore() {
        let res = finish(Err(anyhow!("poll failed")), Err(anyhow!("restore failed")));
        assert_eq!(res.unwrap_err().to_string(), "poll failed");

        let res = finish(Ok(()), Err(anyhow!("restore failed")));
        assert_eq!(res.unwrap_err().to_string(), "restore failed");

        let res = finish(Err(anyhow!("poll failed")), Ok(()));
        assert_eq!(res.unwrap_err().to_string(), "poll failed");

        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
