use crate::dashboard::Dashboard;
use crate::models::{Category, IncomeSource, ViewMode, OVERVIEW};
use std::fmt::Write;

pub fn render_index(dashboard: &Dashboard) -> String {
    let state = dashboard.to_state();
    let snapshot = dashboard.snapshot();

    INDEX_HTML
        .replace("{{MONTH}}", &escape(&snapshot.month_label))
        .replace("{{MODE}}", mode_id(state.active_mode))
        .replace("{{SIDEBAR_VIEW}}", &escape(&state.sidebar_view))
        .replace(
            "{{SIDEBAR_CATEGORY}}",
            &escape(state.sidebar_category.as_deref().unwrap_or("")),
        )
        .replace("{{SIDEBAR}}", &sidebar_buttons())
        .replace("{{EXPENSE_TICKETS}}", &expense_tickets(dashboard))
        .replace("{{INCOME_FIELDS}}", &income_fields(dashboard))
}

fn mode_id(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Expenses => "expenses",
        ViewMode::Income => "income",
        ViewMode::Balance => "balance",
    }
}

fn sidebar_buttons() -> String {
    let mut html = format!(r#"<button class="side-btn" data-view="{OVERVIEW}">Overview</button>"#);
    for category in Category::ALL {
        let _ = write!(
            html,
            r#"<button class="side-btn" data-view="category" data-category="{}">{}</button>"#,
            category.id(),
            category.label()
        );
    }
    html
}

fn expense_tickets(dashboard: &Dashboard) -> String {
    let totals = dashboard.totals();
    let mut html = String::new();
    for category in Category::ALL {
        let _ = write!(
            html,
            r#"<div class="ticket expense-ticket" data-category="{id}"><h3>{label}</h3>"#,
            id = category.id(),
            label = category.label()
        );
        for (index, (name, raw)) in category
            .fields()
            .iter()
            .zip(totals.fields(category))
            .enumerate()
        {
            let _ = write!(
                html,
                r#"<label>{name}<input type="number" step="any" data-category="{id}" data-index="{index}" value="{value}" /></label>"#,
                name = escape(name),
                id = category.id(),
                value = escape(raw)
            );
        }
        let _ = write!(
            html,
            r#"<p class="ticket-total">Total <span class="total-value" data-total="{}">0</span></p></div>"#,
            category.id()
        );
    }
    html
}

fn income_fields(dashboard: &Dashboard) -> String {
    let raw = dashboard.totals().income_fields();
    let mut html = String::new();
    for source in IncomeSource::ALL {
        let _ = write!(
            html,
            r#"<label>{label}<input type="number" step="any" data-source="{id}" value="{value}" /></label>"#,
            label = source.label(),
            id = source.id(),
            value = escape(&raw[source.index()])
        );
    }
    html
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            other => out.push(other),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Budget Dashboard</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #23262b;
      --muted: #6a6f76;
      --card: #ffffff;
      --good: #1dd1a1;
      --warn: #feca57;
      --bad: #ff6b6b;
      --accent: #5f27cd;
      --shadow: 0 18px 40px rgba(35, 38, 43, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 28px 18px 48px;
    }

    .app {
      max-width: 1080px;
      margin: 0 auto;
      display: grid;
      gap: 22px;
    }

    header h1 {
      margin: 0;
    }

    .subtitle,
    .hint {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .modes,
    .sidebar {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
    }

    .mode-card,
    .side-btn {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      background: var(--card);
      box-shadow: var(--shadow);
      cursor: pointer;
      font: inherit;
    }

    .mode-card.active,
    .side-btn.active {
      background: var(--accent);
      color: #fff;
    }

    .section {
      display: none;
      gap: 18px;
    }

    .section.visible {
      display: grid;
    }

    .tickets {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(230px, 1fr));
      gap: 16px;
    }

    .ticket,
    .panel {
      background: var(--card);
      border-radius: 18px;
      box-shadow: var(--shadow);
      padding: 18px;
    }

    .ticket.hidden {
      display: none;
    }

    .ticket h3,
    .panel h2 {
      margin: 0 0 10px;
    }

    label {
      display: grid;
      gap: 4px;
      margin-bottom: 8px;
      font-size: 0.9rem;
      color: var(--muted);
    }

    input {
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid #d9d4ca;
      font: inherit;
    }

    .ticket-total {
      margin: 8px 0 0;
      font-weight: 600;
    }

    .bars {
      display: grid;
      gap: 8px;
    }

    .bar-row {
      display: grid;
      grid-template-columns: 130px 1fr 110px;
      gap: 10px;
      align-items: center;
      font-size: 0.9rem;
    }

    .bar-track {
      height: 12px;
      border-radius: 999px;
      background: #ece8df;
      overflow: hidden;
    }

    .bar-fill {
      height: 100%;
      background: var(--accent);
    }

    .bar-fill.comfortable { background: var(--good); }
    .bar-fill.caution { background: var(--warn); }
    .bar-fill.critical { background: var(--bad); }

    .figures {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .figure .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .status.surplus,
    .tier.excellent { color: var(--good); }
    .status.break_even,
    .tier.good { color: #c79100; }
    .status.deficit,
    .tier.poor { color: var(--bad); }

    .warning {
      color: var(--bad);
      font-weight: 600;
    }

    .warning.hidden {
      display: none;
    }

    .budget-form {
      display: flex;
      gap: 10px;
      align-items: end;
    }
  </style>
</head>
<body>
  <main class="app" data-mode="{{MODE}}" data-sidebar-view="{{SIDEBAR_VIEW}}" data-sidebar-category="{{SIDEBAR_CATEGORY}}">
    <header>
      <h1>Budget Dashboard</h1>
      <p class="subtitle">{{MONTH}}</p>
    </header>

    <nav class="modes">
      <button class="mode-card" data-mode="expenses">Expenses</button>
      <button class="mode-card" data-mode="income">Income</button>
      <button class="mode-card" data-mode="balance">Balance</button>
    </nav>

    <section class="section" id="expensesSection">
      <div class="sidebar">{{SIDEBAR}}</div>
      <div class="panel" id="expenseOverview">
        <h2>Spending by category</h2>
        <div class="bars" id="expenseChart"></div>
        <h2>Top categories</h2>
        <div class="bars" id="breakdownList"></div>
      </div>
      <div class="tickets">{{EXPENSE_TICKETS}}</div>
    </section>

    <section class="section" id="incomeSection">
      <div class="panel">
        <h2>Income sources</h2>
        {{INCOME_FIELDS}}
        <p class="ticket-total">Total <span id="incomeTotal">0</span></p>
      </div>
      <div class="panel">
        <h2>Income mix</h2>
        <div class="bars" id="incomeChart"></div>
      </div>
    </section>

    <section class="section" id="balanceSection">
      <div class="panel figures">
        <div class="figure"><div>Income</div><div class="value" id="balanceIncome">0</div></div>
        <div class="figure"><div>Expenses</div><div class="value" id="balanceExpenses">0</div></div>
        <div class="figure"><div>Net balance</div><div class="value" id="netBalance">0</div></div>
        <div class="figure"><div>Monthly budget</div><div class="value" id="monthlyBudget">0</div></div>
      </div>
      <div class="panel">
        <h2 class="status" id="balanceStatus"></h2>
        <p id="balanceMessage"></p>
        <p id="spendingInsight"></p>
        <div class="bars" id="balanceChart"></div>
      </div>
      <div class="panel">
        <h2>Monthly budget</h2>
        <form class="budget-form" id="budgetForm">
          <label>Budget<input type="number" step="any" id="budgetInput" /></label>
          <button class="mode-card" type="submit">Set budget</button>
        </form>
        <div class="bars" id="budgetProgress"></div>
        <p class="warning hidden" id="budgetWarning">You have exceeded your monthly budget.</p>
      </div>
      <div class="panel">
        <h2 class="tier" id="healthStatus"></h2>
        <p id="healthMessage"></p>
      </div>
      <div class="panel">
        <h2>Insights</h2>
        <ul id="insightsList"></ul>
      </div>
    </section>

    <p class="hint" id="status"></p>
  </main>

  <script>
    const app = document.querySelector('.app');
    const statusEl = document.getElementById('status');
    const modeCards = Array.from(document.querySelectorAll('.mode-card[data-mode]'));
    const sideButtons = Array.from(document.querySelectorAll('.side-btn'));
    const tickets = Array.from(document.querySelectorAll('.expense-ticket'));
    const sections = {
      expenses: document.getElementById('expensesSection'),
      income: document.getElementById('incomeSection'),
      balance: document.getElementById('balanceSection')
    };

    const setStatus = (message) => {
      statusEl.textContent = message;
    };

    const fmt = (value) => {
      const rounded = Math.round(value * 100) / 100;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(2);
    };

    const renderBars = (el, rows) => {
      const max = Math.max(0, ...rows.map((row) => row.value));
      el.innerHTML = rows
        .map((row) => {
          const width = max > 0 ? Math.max(0, (row.value / max) * 100) : 0;
          return `<div class="bar-row"><span>${row.label}</span>` +
            `<div class="bar-track"><div class="bar-fill ${row.css || ''}" style="width:${width}%"></div></div>` +
            `<span>${row.text}</span></div>`;
        })
        .join('');
    };

    const render = (data) => {
      data.expenses.forEach((point) => {
        const el = document.querySelector(`[data-total="${point.id}"]`);
        if (el) el.textContent = fmt(point.total);
      });
      renderBars(document.getElementById('expenseChart'), data.expenses.map((point) => ({
        label: point.label, value: point.total, text: fmt(point.total)
      })));
      renderBars(document.getElementById('breakdownList'), data.breakdown.map((item) => ({
        label: item.label, value: item.percent, text: `${fmt(item.amount)} (${item.percent.toFixed(1)}%)`
      })));

      document.getElementById('incomeTotal').textContent = fmt(data.total_income);
      renderBars(document.getElementById('incomeChart'), data.income.map((point) => ({
        label: point.label, value: point.total, text: fmt(point.total)
      })));

      document.getElementById('balanceIncome').textContent = fmt(data.total_income);
      document.getElementById('balanceExpenses').textContent = fmt(data.total_expense);
      document.getElementById('netBalance').textContent = fmt(data.net_balance);
      document.getElementById('monthlyBudget').textContent = fmt(data.monthly_budget);

      const statusHead = document.getElementById('balanceStatus');
      statusHead.textContent = data.balance.label;
      statusHead.className = `status ${data.balance.status}`;
      document.getElementById('balanceMessage').textContent = data.balance.message;
      document.getElementById('spendingInsight').textContent = data.spending_share === null
        ? ''
        : `You spent ${data.spending_share.toFixed(1)}% of your income this month.`;
      renderBars(document.getElementById('balanceChart'), [
        { label: 'Income', value: data.total_income, text: fmt(data.total_income), css: 'comfortable' },
        { label: 'Expenses', value: data.total_expense, text: fmt(data.total_expense), css: 'critical' }
      ]);

      const budgetEl = document.getElementById('budgetProgress');
      const warning = document.getElementById('budgetWarning');
      if (data.budget) {
        budgetEl.innerHTML = `<div class="bar-row"><span>Used</span>` +
          `<div class="bar-track"><div class="bar-fill ${data.budget.band}" style="width:${data.budget.percent}%"></div></div>` +
          `<span>${data.budget.percent.toFixed(0)}%</span></div>`;
        warning.classList.toggle('hidden', !data.budget.over_budget);
      } else {
        budgetEl.innerHTML = '';
        warning.classList.add('hidden');
      }

      const tier = document.getElementById('healthStatus');
      tier.textContent = data.health.label;
      tier.className = `tier ${data.health.tier}`;
      document.getElementById('healthMessage').textContent = data.health.message;
      document.getElementById('insightsList').innerHTML = data.insights
        .map((insight) => `<li>${insight.message}</li>`)
        .join('');

      showMode(data.active_mode);
      showSidebar(data.sidebar_view, data.sidebar_category);
    };

    const showMode = (mode) => {
      modeCards.forEach((card) => card.classList.toggle('active', card.dataset.mode === mode));
      Object.entries(sections).forEach(([key, el]) => el.classList.toggle('visible', key === mode));
    };

    const showSidebar = (view, category) => {
      const overview = view === 'overview' || !category;
      document.getElementById('expenseOverview').style.display = overview ? 'block' : 'none';
      tickets.forEach((ticket) => {
        ticket.classList.toggle('hidden', !overview && ticket.dataset.category !== category);
      });
      sideButtons.forEach((btn) => {
        const active = overview ? btn.dataset.view === 'overview' : btn.dataset.category === category;
        btn.classList.toggle('active', active);
      });
    };

    const post = async (path, body) => {
      const res = await fetch(path, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const run = (promise) => promise.then(render).catch((err) => setStatus(err.message));

    document.querySelectorAll('input[data-category]').forEach((input) => {
      input.addEventListener('input', () => run(post('/api/expenses', {
        category: input.dataset.category,
        index: Number(input.dataset.index),
        value: input.value
      })));
    });

    document.querySelectorAll('input[data-source]').forEach((input) => {
      input.addEventListener('input', () => run(post('/api/income', {
        source: input.dataset.source,
        value: input.value
      })));
    });

    modeCards.forEach((card) => {
      card.addEventListener('click', () => run(post('/api/view', { mode: card.dataset.mode })));
    });

    sideButtons.forEach((btn) => {
      btn.addEventListener('click', () => run(post('/api/view', {
        sidebar_view: btn.dataset.view,
        sidebar_category: btn.dataset.category || null
      })));
    });

    document.getElementById('budgetForm').addEventListener('submit', (event) => {
      event.preventDefault();
      const input = document.getElementById('budgetInput');
      post('/api/budget', { value: input.value })
        .then((data) => {
          setStatus(data.budget_applied ? '' : 'Budget must be a number above zero.');
          render(data);
        })
        .catch((err) => setStatus(err.message));
    });

    showMode(app.dataset.mode);
    showSidebar(app.dataset.sidebarView, app.dataset.sidebarCategory);
    fetch('/api/dashboard')
      .then((res) => res.json())
      .then(render)
      .catch((err) => setStatus(err.message));
  </script>
</body>
</html>
"#;
