// ---------------------------------------------------------------------------
// Embedded upload page
// ---------------------------------------------------------------------------

/// Self-contained page served at `/`: one PDF input, four result panels.
pub const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>MedEL: Medical document data Extraction using LLM</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; padding: 24px;
      max-width: 1100px; margin: 0 auto;
    }
    h1 { font-size: 24px; margin-bottom: 8px; }
    p.description { color: #78716c; font-size: 14px; margin-bottom: 24px; }
    .layout { display: grid; grid-template-columns: 1fr 2fr; gap: 24px; }
    .panel {
      background: white; border: 1px solid #d6d3d1; border-radius: 12px;
      padding: 16px; margin-bottom: 16px;
    }
    .panel h2 { font-size: 14px; color: #44403c; margin-bottom: 8px; }
    pre {
      font-size: 12px; white-space: pre-wrap; word-break: break-word;
      max-height: 360px; overflow: auto;
    }
    .btn {
      padding: 12px 16px; border-radius: 12px; font-size: 15px; font-weight: 500;
      cursor: pointer; border: none; width: 100%; margin-top: 12px;
      background: #4a7c59; color: white;
    }
    .btn:disabled { opacity: 0.5; cursor: not-allowed; }
    .score { font-size: 32px; font-weight: 600; }
    .status { margin-top: 12px; font-size: 14px; }
    .status.error { color: #dc2626; }
    a.download { color: #4a7c59; font-weight: 500; }
    a.download.hidden { display: none; }
  </style>
</head>
<body>
  <h1>MedEL: Medical document data Extraction using LLM</h1>
  <p class="description">Upload a PDF medical report to extract information as JSON using a simple LLM-powered pipeline.</p>

  <div class="layout">
    <div>
      <div class="panel">
        <h2>PDF medical report</h2>
        <input type="file" id="file" accept=".pdf,application/pdf">
        <button class="btn" id="submit" disabled>Submit</button>
        <div class="status" id="status"></div>
      </div>
    </div>
    <div>
      <div class="panel">
        <h2>General patient information</h2>
        <pre id="general-info"></pre>
      </div>
      <div class="panel">
        <h2>Answers to specific questions</h2>
        <pre id="specific-info"></pre>
      </div>
      <div class="panel">
        <h2>Treatment plan appropriateness score (%)</h2>
        <div class="score" id="score"></div>
      </div>
      <div class="panel">
        <h2>Download JSON</h2>
        <a class="download hidden" id="download" href="/api/report" download="output.json">output.json</a>
      </div>
    </div>
  </div>

  <script>
    const fileInput = document.getElementById('file');
    const submit = document.getElementById('submit');
    const status = document.getElementById('status');

    fileInput.addEventListener('change', () => {
      submit.disabled = fileInput.files.length === 0;
    });

    submit.addEventListener('click', async () => {
      const form = new FormData();
      form.append('file', fileInput.files[0]);
      submit.disabled = true;
      status.className = 'status';
      status.textContent = 'Processing, this can take several minutes...';

      try {
        const res = await fetch('/api/process', { method: 'POST', body: form });
        const data = await res.json();
        if (!res.ok) {
          throw new Error(data.error ? data.error.message : res.statusText);
        }
        document.getElementById('general-info').textContent =
          JSON.stringify(data.general_info, null, 2);
        document.getElementById('specific-info').textContent =
          JSON.stringify(data.specific_info, null, 2);
        document.getElementById('score').textContent = data.overall_score.toFixed(2);
        document.getElementById('download').classList.remove('hidden');
        status.textContent = 'Done.';
      } catch (e) {
        status.className = 'status error';
        status.textContent = e.message;
      } finally {
        submit.disabled = fileInput.files.length === 0;
      }
    });
  </script>
</body>
</html>
"#;
