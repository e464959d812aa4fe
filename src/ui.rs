use crate::models::{CountdownResponse, ThemeMode};

pub fn render_index(countdown: &CountdownResponse, date: &str, theme: ThemeMode) -> String {
    let (body_class, theme_icon) = match theme {
        ThemeMode::Dark => ("dark", "☀️"),
        _ => ("", "🌙"),
    };

    INDEX_HTML
        .replace("{{BODY_CLASS}}", body_class)
        .replace("{{THEME_ICON}}", theme_icon)
        .replace("{{DATE}}", date)
        .replace("{{DAYS_LEFT}}", &countdown.days_left.to_string())
        .replace("{{PROGRESS}}", &countdown.progress_percent.to_string())
        .replace("{{START}}", &countdown.start_date)
        .replace("{{END}}", &countdown.end_date)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Study Dashboard</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --muted: #6b645d;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --panel: #ffffff;
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      --ok: #2d7a4b;
      --warn: #b8860b;
      --crit: #c63b2b;
    }

    body.dark {
      --bg-1: #191d24;
      --bg-2: #2a3442;
      --ink: #e8e4da;
      --muted: #9aa3ad;
      --card: rgba(30, 36, 44, 0.92);
      --panel: #242b34;
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.5);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), var(--bg-1) 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
      transition: background 300ms ease, color 300ms ease;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      align-items: flex-start;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
      font-size: 1rem;
    }

    #theme-toggle {
      font-size: 1.2rem;
      background: var(--panel);
      border: 1px solid rgba(47, 72, 88, 0.12);
      border-radius: 999px;
      padding: 10px 14px;
      cursor: pointer;
    }

    section.widget {
      background: var(--panel);
      border-radius: 20px;
      padding: 22px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 14px;
    }

    .widget h2 {
      margin: 0;
      font-size: 1.25rem;
    }

    .progress-track {
      height: 14px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.12);
      overflow: hidden;
    }

    .progress-fill {
      height: 100%;
      border-radius: 999px;
      background: linear-gradient(90deg, var(--accent), var(--accent-2));
      transition: width 400ms ease;
    }

    .countdown-row {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 8px;
      color: var(--muted);
      font-size: 0.95rem;
    }

    form.inline {
      display: flex;
      gap: 10px;
      flex-wrap: wrap;
    }

    input[type="text"], input[type="number"], textarea {
      flex: 1;
      min-width: 180px;
      font: inherit;
      color: inherit;
      background: transparent;
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 12px;
      padding: 10px 14px;
    }

    textarea {
      width: 100%;
      resize: vertical;
      min-height: 56px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 20px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.97);
    }

    button.secondary {
      background: var(--accent-2);
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    li {
      padding: 8px 12px;
      border-radius: 10px;
      background: rgba(47, 72, 88, 0.06);
      display: flex;
      align-items: center;
      gap: 10px;
    }

    li.weak-warning {
      border-left: 4px solid var(--warn);
    }

    li.weak-critical {
      border-left: 4px solid var(--crit);
    }

    li span.done {
      text-decoration: line-through;
      color: var(--muted);
    }

    .meta {
      color: var(--muted);
      font-size: 0.92rem;
    }

    .meta[data-level="warning"] {
      color: var(--warn);
    }

    .meta[data-level="critical"] {
      color: var(--crit);
    }

    #focus-strip {
      height: 6px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.12);
    }

    #focus-strip.focus-planned { background: var(--accent-2); }
    #focus-strip.focus-progress { background: var(--warn); }
    #focus-strip.focus-complete { background: var(--ok); }

    .mock-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 10px;
    }

    .status {
      font-size: 0.95rem;
      color: var(--muted);
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: var(--crit);
    }

    .status[data-type="ok"] {
      color: var(--ok);
    }

    footer {
      text-align: center;
      color: var(--muted);
      font-size: 0.85rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
    }
  </style>
</head>
<body class="{{BODY_CLASS}}">
  <main class="app">
    <header>
      <div>
        <h1>Study Dashboard</h1>
        <p class="subtitle">Plan the day, track the week, keep the streak honest.</p>
      </div>
      <button id="theme-toggle" type="button" title="Toggle theme">{{THEME_ICON}}</button>
    </header>

    <section class="widget">
      <h2>Exam countdown</h2>
      <div class="progress-track">
        <div class="progress-fill" id="time-progress" style="width: {{PROGRESS}}%"></div>
      </div>
      <div class="countdown-row">
        <span>{{START}} &rarr; {{END}}</span>
        <span><strong id="days-left">{{DAYS_LEFT}}</strong> days left &middot; <span id="progress-percent">{{PROGRESS}}</span>% elapsed</span>
      </div>
    </section>

    <section class="widget">
      <h2>Today's focus</h2>
      <div id="focus-strip"></div>
      <ul id="task-list"></ul>
      <p class="meta" id="task-info"></p>
      <form class="inline" id="task-form">
        <input type="text" id="task-input" placeholder="One concrete task..." />
        <button type="submit">Add task</button>
      </form>
    </section>

    <section class="widget">
      <h2>Planned vs executed</h2>
      <ul id="output-list"></ul>
      <p class="meta" id="output-stats"></p>
    </section>

    <section class="widget">
      <h2>Weekly weak areas</h2>
      <ul id="weak-list"></ul>
      <p class="meta" id="weak-status"></p>
      <form class="inline" id="weak-form">
        <input type="text" id="weak-input" placeholder="Topic that needs work..." />
        <button type="submit">Add weak area</button>
      </form>
    </section>

    <section class="widget">
      <h2>Revision log</h2>
      <ul id="revision-list"></ul>
      <p class="meta" id="revision-status"></p>
      <form class="inline" id="revision-form">
        <input type="text" id="revision-input" placeholder="Topic revised..." />
        <button type="submit">Log revision</button>
        <button type="button" class="secondary" id="clear-revisions">Clear log</button>
      </form>
    </section>

    <section class="widget">
      <h2>Mock analysis</h2>
      <form id="mock-form">
        <div class="mock-grid">
          <input type="text" id="mock-score" placeholder="Score" />
          <input type="text" id="mock-accuracy" placeholder="Accuracy %" />
        </div>
        <textarea id="mock-mistakes" placeholder="What went wrong"></textarea>
        <textarea id="mock-fixes" placeholder="How to fix it"></textarea>
        <p class="meta" id="mock-status"></p>
        <button type="submit">Save analysis</button>
      </form>
    </section>

    <section class="widget">
      <h2>Mistake log</h2>
      <ul id="mistake-list"></ul>
      <form class="inline" id="mistake-form">
        <input type="text" id="mistake-input" placeholder="Mistake worth remembering..." />
        <button type="submit">Add mistake</button>
      </form>
    </section>

    <div class="status" id="status"></div>
    <footer>Last updated {{DATE}}</footer>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const themeToggle = document.getElementById('theme-toggle');

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (type === 'ok') {
        setTimeout(() => setStatus('', ''), 1200);
      }
    };

    const api = async (url, body) => {
      const res = await fetch(url, body === undefined ? undefined : {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    /* ---------- theme ---------- */

    const applyTheme = (effective) => {
      document.body.classList.toggle('dark', effective === 'dark');
      themeToggle.textContent = effective === 'dark' ? '☀️' : '🌙';
    };

    const loadTheme = async () => {
      const theme = await api('/api/theme');
      applyTheme(theme.effective);
      return theme;
    };

    themeToggle.addEventListener('click', () => {
      const next = document.body.classList.contains('dark') ? 'light' : 'dark';
      api('/api/theme', { mode: next })
        .then((theme) => applyTheme(theme.effective))
        .catch((err) => setStatus(err.message, 'error'));
    });

    // Auto mode re-resolves against the clock every 5 minutes.
    setInterval(() => {
      loadTheme().catch(() => {});
    }, 5 * 60 * 1000);

    /* ---------- tasks + execution ---------- */

    const taskList = document.getElementById('task-list');
    const taskInfo = document.getElementById('task-info');
    const outputList = document.getElementById('output-list');
    const outputStats = document.getElementById('output-stats');
    const focusStrip = document.getElementById('focus-strip');

    const renderTasks = (data) => {
      taskList.innerHTML = '';
      data.tasks.forEach((task) => {
        const li = document.createElement('li');
        li.textContent = '• ' + task;
        taskList.appendChild(li);
      });
      taskInfo.textContent = `${data.tasks.length} / ${data.limit} tasks set for today`;
    };

    const renderExecution = (data) => {
      outputList.innerHTML = '';
      data.items.forEach((item) => {
        const li = document.createElement('li');
        const checkbox = document.createElement('input');
        checkbox.type = 'checkbox';
        checkbox.checked = item.done;
        checkbox.addEventListener('change', () => {
          api('/api/execution', { task: item.task, done: checkbox.checked })
            .then(renderExecution)
            .catch((err) => setStatus(err.message, 'error'));
        });

        const label = document.createElement('span');
        label.textContent = item.done && item.time
          ? `${item.task} (${item.time})`
          : item.task;
        if (item.done) {
          label.classList.add('done');
        }

        li.appendChild(checkbox);
        li.appendChild(label);
        outputList.appendChild(li);
      });

      outputStats.textContent = `Planned: ${data.planned} | Executed: ${data.executed}`;

      focusStrip.className = '';
      if (data.planned === 0) {
        return;
      }
      if (data.executed === 0) {
        focusStrip.classList.add('focus-planned');
      } else if (data.executed < data.planned) {
        focusStrip.classList.add('focus-progress');
      } else {
        focusStrip.classList.add('focus-complete');
      }
    };

    const loadTasks = () => api('/api/tasks').then(renderTasks);
    const loadExecution = () => api('/api/execution').then(renderExecution);

    document.getElementById('task-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const input = document.getElementById('task-input');
      const task = input.value.trim();
      if (!task) return;
      api('/api/tasks', { task })
        .then((data) => {
          input.value = '';
          renderTasks(data);
          return loadExecution();
        })
        .then(() => setStatus('Saved', 'ok'))
        .catch((err) => setStatus(err.message, 'error'));
    });

    /* ---------- weak areas ---------- */

    const weakList = document.getElementById('weak-list');
    const weakStatus = document.getElementById('weak-status');

    const renderWeak = (data) => {
      weakList.innerHTML = '';
      data.topics.forEach((topic) => {
        const li = document.createElement('li');
        li.textContent = '• ' + topic.text;
        if (topic.status === 'critical') {
          li.classList.add('weak-critical');
        } else if (topic.status === 'warning') {
          li.classList.add('weak-warning');
        }
        weakList.appendChild(li);
      });

      const remaining = data.days_remaining;
      weakStatus.dataset.level = '';
      if (data.week_status === 'over') {
        weakStatus.textContent = 'Week over. Add new weak areas.';
      } else if (data.week_status === 'critical') {
        weakStatus.textContent = remaining === 1
          ? '⚠ Only 1 day left to complete weak topics'
          : `⚠ Only ${remaining} days left to complete weak topics`;
        weakStatus.dataset.level = 'critical';
      } else {
        weakStatus.textContent = `${remaining} days left to fix weak areas`;
        if (data.week_status === 'warning') {
          weakStatus.dataset.level = 'warning';
        }
      }
    };

    const loadWeak = () => api('/api/weak').then(renderWeak);

    document.getElementById('weak-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const input = document.getElementById('weak-input');
      const topic = input.value.trim();
      if (!topic) return;
      api('/api/weak', { topic })
        .then((data) => {
          input.value = '';
          renderWeak(data);
          setStatus('Saved', 'ok');
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    /* ---------- revision log ---------- */

    const revisionList = document.getElementById('revision-list');
    const revisionStatus = document.getElementById('revision-status');

    const renderRevisions = (data) => {
      revisionList.innerHTML = '';
      data.recent.forEach((entry) => {
        const li = document.createElement('li');
        li.textContent = `✓ ${entry.topic} — ${entry.date}`;
        revisionList.appendChild(li);
      });
      revisionStatus.textContent = data.total === 0
        ? 'No revisions logged yet.'
        : `Total revisions logged: ${data.total}`;
    };

    const loadRevisions = () => api('/api/revisions').then(renderRevisions);

    document.getElementById('revision-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const input = document.getElementById('revision-input');
      const topic = input.value.trim();
      if (!topic) return;
      api('/api/revisions', { topic })
        .then((data) => {
          input.value = '';
          renderRevisions(data);
          setStatus('Saved', 'ok');
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('clear-revisions').addEventListener('click', () => {
      if (!confirm('Clear entire revision log?')) return;
      api('/api/revisions/clear', {})
        .then(renderRevisions)
        .catch((err) => setStatus(err.message, 'error'));
    });

    /* ---------- mock analysis ---------- */

    const mockStatus = document.getElementById('mock-status');

    const renderMock = (data) => {
      if (!data.record) {
        mockStatus.textContent = 'No mock analysis saved yet.';
        return;
      }
      document.getElementById('mock-score').value = data.record.score;
      document.getElementById('mock-accuracy').value = data.record.accuracy;
      document.getElementById('mock-mistakes').value = data.record.mistakes;
      document.getElementById('mock-fixes').value = data.record.fixes;
      mockStatus.textContent = data.stale
        ? '⚠ No mock analyzed in the last 7 days.'
        : `Last analyzed on ${data.record.date}`;
      mockStatus.dataset.level = data.stale ? 'warning' : '';
    };

    const loadMock = () => api('/api/mock').then(renderMock);

    document.getElementById('mock-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/mock', {
        score: document.getElementById('mock-score').value,
        accuracy: document.getElementById('mock-accuracy').value,
        mistakes: document.getElementById('mock-mistakes').value,
        fixes: document.getElementById('mock-fixes').value
      })
        .then((data) => {
          renderMock(data);
          setStatus('Saved', 'ok');
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    /* ---------- mistake log ---------- */

    const mistakeList = document.getElementById('mistake-list');

    const renderMistakes = (data) => {
      mistakeList.innerHTML = '';
      data.mistakes.forEach((mistake) => {
        const li = document.createElement('li');
        li.textContent = '• ' + mistake;
        mistakeList.appendChild(li);
      });
    };

    const loadMistakes = () => api('/api/mistakes').then(renderMistakes);

    document.getElementById('mistake-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const input = document.getElementById('mistake-input');
      const text = input.value.trim();
      if (!text) return;
      api('/api/mistakes', { text })
        .then((data) => {
          input.value = '';
          renderMistakes(data);
          setStatus('Saved', 'ok');
        })
        .catch((err) => setStatus(err.message, 'error'));
    });

    /* ---------- boot ---------- */

    Promise.all([
      loadTheme(),
      loadTasks(),
      loadExecution(),
      loadWeak(),
      loadRevisions(),
      loadMock(),
      loadMistakes()
    ]).catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
