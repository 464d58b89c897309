//! Widget page served at `/`
//!
//! The page holds no timer logic of its own: it renders whatever `TimerView`
//! arrives on `/events` and posts button clicks back to the server.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Pomodoro</title>
  <style>
    body { font-family: sans-serif; display: flex; justify-content: center; margin-top: 4rem; }
    .timer { background: #fef3c7; border: 1px solid #000; border-radius: 0.5rem; padding: 2rem 4rem; text-align: center; }
    .timer h1 { font-size: 4rem; margin: 2rem 0; font-variant-numeric: tabular-nums; }
    .timer button { background: #22c55e; border: none; cursor: pointer; margin: 0 0.25rem; padding: 0.5rem 1.5rem; }
  </style>
</head>
<body>
  <div class="timer">
    <h1 id="display">25:00</h1>
    <button id="primary">Start</button>
    <button id="reset">Reset</button>
  </div>
  <script>
    const display = document.getElementById("display");
    const primary = document.getElementById("primary");
    const reset = document.getElementById("reset");

    function render(view) {
      display.textContent = view.display;
      primary.textContent = view.primary_label;
    }

    async function post(path) {
      const res = await fetch(path, { method: "POST" });
      if (res.ok) {
        render((await res.json()).timer);
      }
    }

    primary.addEventListener("click", () => post("/toggle"));
    reset.addEventListener("click", () => post("/reset"));

    const events = new EventSource("/events");
    events.addEventListener("timer", (e) => render(JSON.parse(e.data)));
  </script>
</body>
</html>
"#;
