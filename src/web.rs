pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Trading Bot Console</title>
<style>
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#0f1117;color:#e1e4e8;min-height:100vh;padding:16px}
h1{font-size:20px;margin-bottom:12px;color:#58a6ff}
h2{font-size:14px;font-weight:600;color:#8b949e;text-transform:uppercase;letter-spacing:1px;margin-bottom:8px}
.grid{display:grid;grid-template-columns:1fr 1fr;gap:12px;max-width:900px;margin:0 auto}
.full{grid-column:1/-1}
.card{background:#161b22;border:1px solid #30363d;border-radius:8px;padding:14px}
.status-bar{display:flex;gap:12px;flex-wrap:wrap;align-items:center}
.badge{padding:3px 10px;border-radius:12px;font-size:12px;font-weight:600;text-transform:uppercase}
.badge-off{background:#30363d;color:#8b949e}
.badge-on{background:#238636;color:#fff}
.badge-warn{background:#d29922;color:#000}
.stat{margin:4px 0}
.stat span{color:#8b949e;font-size:12px}
.stat strong{color:#e1e4e8;font-size:14px;margin-left:4px}
.balance{font-size:22px;color:#fff;margin:6px 0}
.balance small{font-size:13px;color:#8b949e;margin-left:4px}
input{background:#0d1117;border:1px solid #30363d;color:#e1e4e8;padding:6px 10px;border-radius:4px;font-size:13px;width:100%}
input:focus{outline:none;border-color:#58a6ff}
label{font-size:12px;color:#8b949e;display:block;margin-bottom:3px;margin-top:8px}
.row{display:flex;gap:8px}
.row>*{flex:1}
button{padding:8px 14px;border:none;border-radius:6px;font-size:13px;font-weight:600;cursor:pointer;transition:opacity .15s}
button:hover{opacity:.85}
.btn-primary{background:#238636;color:#fff}
.btn-warn{background:#d29922;color:#000}
.info{min-height:18px;margin-top:6px;font-size:13px;font-weight:600;color:#c9d1d9}
.addr{font-family:'SF Mono',Monaco,Consolas,monospace;font-size:12px;word-break:break-all}
.gate{max-width:900px;margin:120px auto;text-align:center;font-size:26px;font-weight:300;color:#8b949e}
.events{max-height:240px;overflow-y:auto;font-size:12px;font-family:'SF Mono',Monaco,Consolas,monospace}
.events::-webkit-scrollbar{width:6px}
.events::-webkit-scrollbar-thumb{background:#30363d;border-radius:3px}
.ev{padding:3px 0;border-bottom:1px solid #21262d;display:flex;gap:8px}
.ev-ts{color:#484f58;min-width:55px}
.ev-kind{color:#58a6ff;min-width:55px;font-weight:600}
.ev-detail{color:#c9d1d9}
.ev-error .ev-kind{color:#da3633}
.ev-warn .ev-kind{color:#d29922}
</style>
</head>
<body>

<div id="gate" class="gate" style="display:none">Connect Your Wallet</div>

<div id="app" class="grid" style="display:none">

<div class="card full">
  <div style="display:flex;justify-content:space-between;align-items:center">
    <h1>Trading Bot Console</h1>
    <div class="status-bar">
      <span id="chainBadge" class="badge badge-off">CHAIN —</span>
      <span id="walletBadge" class="badge badge-off">NO WALLET</span>
    </div>
  </div>
  <div class="stat"><span>Account</span> <strong id="address" class="addr">—</strong></div>
</div>

<!-- Staking -->
<div class="card">
  <h2>Staking</h2>
  <div class="balance"><span id="stakingBalance">0</span><small>WETH</small></div>
  <form onsubmit="return stake(event)">
    <div class="row">
      <input id="stakingAmount" type="number" step="any" min="0" placeholder="Amount" required>
      <button type="submit" class="btn-primary">Stake</button>
    </div>
  </form>
  <div id="stakingStatus" class="info"></div>
  <button class="btn-warn" style="margin-top:8px" onclick="withdrawStaking()">Withdraw</button>
  <div id="withdrawStakingStatus" class="info"></div>
</div>

<!-- Funding -->
<div class="card">
  <h2>Funding</h2>
  <div class="balance"><span id="fundingBalance">0</span><small>LINK</small></div>
  <form onsubmit="return fund(event)">
    <div class="row">
      <input id="fundingAmount" type="number" step="any" min="0" placeholder="Amount" required>
      <button type="submit" class="btn-primary">Fund</button>
    </div>
  </form>
  <div id="fundingStatus" class="info"></div>
  <button class="btn-warn" style="margin-top:8px" onclick="withdrawFunds()">Withdraw</button>
  <div id="withdrawFundingStatus" class="info"></div>
</div>

<!-- Events -->
<div class="card full">
  <h2>Log</h2>
  <div id="eventLog" class="events"></div>
</div>

</div>

<!-- Wallet setup is reachable in both states -->
<div class="grid" style="margin-top:12px">
<div class="card full">
  <h2>Wallet</h2>
  <label>Private Key</label><input id="wKey" type="password" placeholder="0x...">
  <div class="row">
    <div><label>RPC URL</label><input id="wRpc" placeholder="http://127.0.0.1:8545"></div>
    <div><label>Chain ID</label><input id="wChain" type="number" placeholder="5"></div>
  </div>
  <button class="btn-primary" style="margin-top:10px" onclick="saveWallet()">Save Wallet</button>
  <div id="walletInfo" class="info"></div>
</div>
</div>

<script>
async function api(path, opts) {
  const res = await fetch(path, opts);
  if (!res.ok) throw new Error(await res.text());
  return res.json();
}

function el(id) { return document.getElementById(id); }

async function pollStatus() {
  try {
    const s = await api('/api/status');

    el('gate').style.display = s.wallet_set ? 'none' : '';
    el('app').style.display = s.wallet_set ? '' : 'none';

    el('chainBadge').textContent = 'CHAIN ' + s.chain_id;
    el('chainBadge').className = 'badge ' + (s.chain_supported ? 'badge-on' : 'badge-warn');
    el('walletBadge').textContent = s.wallet_set ? 'CONNECTED' : 'NO WALLET';
    el('walletBadge').className = 'badge ' + (s.wallet_set ? 'badge-on' : 'badge-off');
    el('address').textContent = s.address || '—';

    el('stakingBalance').textContent = s.staking_balance;
    el('fundingBalance').textContent = s.funding_balance;
    el('stakingStatus').textContent = s.staking_status;
    el('fundingStatus').textContent = s.funding_status;
    el('withdrawStakingStatus').textContent = s.withdraw_staking_status;
    el('withdrawFundingStatus').textContent = s.withdraw_funding_status;
  } catch(e) { /* ignore poll errors */ }
}

async function pollEvents() {
  try {
    const events = await api('/api/events');
    el('eventLog').innerHTML = events.map(e => {
      let cls = 'ev';
      if (e.kind === 'error') cls += ' ev-error';
      else if (e.kind === 'warn') cls += ' ev-warn';
      return `<div class="${cls}"><span class="ev-ts">${e.ts}</span><span class="ev-kind">${e.kind}</span><span class="ev-detail">${e.detail}</span></div>`;
    }).reverse().join('');
  } catch(e) {}
}

function post(path, body) {
  const opts = {method:'POST'};
  if (body) {
    opts.headers = {'Content-Type':'application/json'};
    opts.body = JSON.stringify(body);
  }
  return api(path, opts);
}

function stake(e) {
  e.preventDefault();
  post('/api/stake', {amount: el('stakingAmount').value})
    .then(() => { el('stakingAmount').value = ''; })
    .catch(() => {});
  return false;
}

function fund(e) {
  e.preventDefault();
  post('/api/fund', {amount: el('fundingAmount').value})
    .then(() => { el('fundingAmount').value = ''; })
    .catch(() => {});
  return false;
}

function withdrawStaking() { post('/api/unstake').catch(() => {}); }
function withdrawFunds() { post('/api/withdraw-funds').catch(() => {}); }

async function saveWallet() {
  const body = {};
  const key = el('wKey').value;
  const rpc = el('wRpc').value;
  const chain = el('wChain').value;
  if (key) body.private_key = key;
  if (rpc) body.rpc_url = rpc;
  if (chain) body.chain_id = parseInt(chain);
  try {
    const r = await post('/api/wallet', body);
    el('walletInfo').textContent = 'Saved — ' + r.address;
    el('wKey').value = '';
  } catch(e) {
    el('walletInfo').textContent = e.message;
  }
}

pollStatus();
pollEvents();
setInterval(() => { pollStatus(); pollEvents(); }, 1500);
</script>
</body>
</html>
"##;
