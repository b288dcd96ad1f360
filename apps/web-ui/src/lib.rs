/// The schedule editor and status report page served by `pms serve-web`.
///
/// The page keeps no state of its own: every action is posted to the bridge
/// as an editor command and the returned view is re-rendered in full.
pub fn app_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>pms schedule</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 1.5rem; background: #f6f7f9; }
        main { max-width: 1100px; margin: 0 auto; }
        section { background: #fff; border: 1px solid #dde; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
        h1, h2, h3 { margin-top: 0; }
        label { display: block; margin: 0.4rem 0 0.2rem; font-weight: 600; }
        input, select, textarea, button { font: inherit; }
        input, select, textarea { width: 100%; padding: 0.4rem; border: 1px solid #ccc; border-radius: 6px; box-sizing: border-box; }
        button { padding: 0.35rem 0.7rem; border: 1px solid #889; border-radius: 6px; background: #f3f3f6; cursor: pointer; }
        button:disabled { opacity: 0.5; cursor: default; }
        table { width: 100%; border-collapse: collapse; }
        td, th { border-bottom: 1px solid #eee; padding: 0.3rem; text-align: left; vertical-align: top; }
        .grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 0.75rem; }
        .row { display: flex; gap: 0.5rem; align-items: end; flex-wrap: wrap; }
        .row > div { flex: 1; min-width: 140px; }
        .phase { border-left: 4px solid #4db6ac; padding-left: 0.75rem; margin-bottom: 1rem; }
        .item { display: flex; gap: 0.4rem; align-items: center; flex-wrap: wrap; margin: 0.25rem 0; }
        .muted { color: #667; font-size: 0.92rem; }
        #notification { padding: 0.6rem; border-radius: 6px; display: none; }
        #notification.success { display: block; background: #e6f6ec; }
        #notification.validation { display: block; background: #fff6dd; }
        #notification.failure { display: block; background: #fde8e8; }
        pre { background: #111; color: #eee; padding: 0.8rem; border-radius: 6px; overflow: auto; }
    </style>
</head>
<body>
<main>
    <h1>Project schedule</h1>

    <section>
        <div class="row">
            <div>
                <label for="project-id">Project id</label>
                <input id="project-id" placeholder="64f0c0ffee..." />
            </div>
            <button onclick="openSchedule()">Open</button>
            <button onclick="send({ action: 'refresh' })">Refresh</button>
            <button onclick="loadReport()">Status report</button>
        </div>
        <p class="muted" id="state">not loaded</p>
        <div id="notification" onclick="send({ action: 'dismiss_notification' })"></div>
    </section>

    <section>
        <h2>Phases</h2>
        <div id="phases" class="muted">(open a project)</div>
        <h3>Add phase</h3>
        <div class="row">
            <div><label for="phase-id">Phase</label><select id="phase-id"></select></div>
            <div><label for="phase-start">Start</label><input id="phase-start" type="date" /></div>
            <div><label for="phase-end">End</label><input id="phase-end" type="date" /></div>
            <button onclick="addPhase()">Add phase</button>
        </div>
        <div id="picker"></div>
    </section>

    <section class="grid">
        <div>
            <h3>Requirements</h3>
            <p class="muted" id="requirements-target"></p>
            <table id="requirements"></table>
            <label for="requirement-id">Requirement</label>
            <select id="requirement-id"></select>
            <button onclick="send({ action: 'add_requirement', requirement_id: value('requirement-id') })">Add requirement</button>
        </div>
        <div>
            <h3>Members</h3>
            <p class="muted" id="members-target"></p>
            <table id="members"></table>
            <label for="member-role">Role</label>
            <select id="member-role"></select>
            <label for="member-id">Member</label>
            <select id="member-id"></select>
            <button onclick="send({ action: 'add_member', role_id: value('member-role'), member_id: value('member-id') })">Add member</button>
        </div>
        <div>
            <h3>Tasks</h3>
            <p class="muted" id="tasks-target"></p>
            <table id="tasks"></table>
            <label for="task-title">Title</label><input id="task-title" />
            <label for="task-description">Description</label><textarea id="task-description"></textarea>
            <label for="task-member">Assignee</label><select id="task-member"></select>
            <label for="task-start">Start</label><input id="task-start" type="date" />
            <label for="task-end">End</label><input id="task-end" type="date" />
            <div class="row">
                <button id="task-save" onclick="saveTask()">Add task</button>
                <button onclick="send({ action: 'cancel_task_edit' })">Cancel</button>
            </div>
        </div>
    </section>

    <section>
        <h2>Status report</h2>
        <pre id="report">(no report yet)</pre>
    </section>
</main>

<script>
    let view = null;

    function value(id) { return document.getElementById(id).value; }
    function projectId() { return encodeURIComponent(value('project-id').trim()); }
    function text(s) { const span = document.createElement('span'); span.textContent = s ?? ''; return span.innerHTML; }
    function day(s) { return (s || '').split('T')[0]; }

    async function fetchJson(url, options) {
        const response = await fetch(url, options);
        const payload = await response.json();
        if (!response.ok) {
            throw new Error(payload.error || JSON.stringify(payload));
        }
        return payload;
    }

    function notify(notification) {
        const box = document.getElementById('notification');
        box.className = notification ? notification.kind : '';
        box.textContent = notification ? notification.message : '';
    }

    async function openSchedule() {
        try {
            render(await fetchJson('/api/projects/' + projectId() + '/schedule'));
        } catch (err) {
            notify({ kind: 'failure', message: err.message });
        }
    }

    async function send(command) {
        try {
            const payload = await fetchJson('/api/projects/' + projectId() + '/actions', {
                method: 'POST',
                headers: { 'content-type': 'application/json' },
                body: JSON.stringify(command)
            });
            render(payload.view);
        } catch (err) {
            notify({ kind: 'failure', message: err.message });
        }
    }

    async function loadReport() {
        try {
            const payload = await fetchJson('/api/projects/' + projectId() + '/report');
            document.getElementById('report').textContent = payload.text;
        } catch (err) {
            document.getElementById('report').textContent = err.message;
        }
    }

    function addPhase() {
        send({ action: 'add_phase', phase_id: value('phase-id'), start_date: value('phase-start'), end_date: value('phase-end') });
    }

    function saveTask() {
        send({
            action: 'save_task',
            title: value('task-title'),
            description: value('task-description'),
            member_id: value('task-member'),
            start_date: value('task-start'),
            end_date: value('task-end')
        });
    }

    function options(id, entries, label) {
        const select = document.getElementById(id);
        select.innerHTML = '<option value=""></option>' + entries
            .map(entry => '<option value="' + text(entry.id) + '">' + text(label(entry)) + '</option>')
            .join('');
    }

    function select(category, phaseId, itemId) {
        send({ action: 'select', category, phase_id: phaseId, config_item_id: itemId });
    }

    function render(next) {
        view = next;
        notify(view.notification);
        document.getElementById('state').textContent = 'state: ' + view.state;
        const busy = view.state !== 'ready';
        document.querySelectorAll('button').forEach(button => { button.disabled = busy; });

        const phases = (view.schedule && view.schedule.phases) || [];
        document.getElementById('phases').innerHTML = phases.length === 0 ? '(no phases)' : phases.map(entry => {
            const phaseId = entry.phase ? entry.phase.id : '';
            const items = entry.config_items.map(item => {
                const itemId = item.config_item.id;
                return '<div class="item">' + text(item.config_item.name)
                    + ' <button onclick="select(\'requirements\', \'' + text(phaseId) + '\', \'' + text(itemId) + '\')">requirements</button>'
                    + ' <button onclick="select(\'members\', \'' + text(phaseId) + '\', \'' + text(itemId) + '\')">members</button>'
                    + ' <button onclick="select(\'tasks\', \'' + text(phaseId) + '\', \'' + text(itemId) + '\')">tasks</button>'
                    + ' <button onclick="send({ action: \'remove_config_item\', phase_id: \'' + text(phaseId) + '\', config_item_id: \'' + text(itemId) + '\' })">remove</button>'
                    + '</div>';
            }).join('');
            return '<div class="phase"><strong>' + text(entry.phase ? entry.phase.name : '(no phase)') + '</strong> '
                + day(entry.start_date) + ' to ' + day(entry.end_date)
                + ' <button onclick="send({ action: \'open_config_item_picker\', phase_id: \'' + text(phaseId) + '\' })">add item</button>'
                + ' <button onclick="send({ action: \'remove_phase\', phase_id: \'' + text(phaseId) + '\' })">remove phase</button>'
                + items + '</div>';
        }).join('');

        const picker = document.getElementById('picker');
        if (view.picker) {
            picker.innerHTML = '<h3>Add configuration item</h3>' + (view.picker.candidates.length === 0
                ? '<p class="muted">(no candidates)</p>'
                : view.picker.candidates.map(item =>
                    '<div class="item">' + text(item.name)
                    + ' <button onclick="send({ action: \'add_config_item\', config_item_id: \'' + text(item.id) + '\' })">add</button></div>'
                ).join(''))
                + '<button onclick="send({ action: \'close_picker\' })">close</button>';
        } else {
            picker.innerHTML = '';
        }

        options('phase-id', view.candidates.phases, phase => phase.name);
        options('requirement-id', view.candidates.requirements, requirement => requirement.name);
        options('member-role', view.candidates.roles, role => role.name);
        options('member-id', view.candidates.members, member => member.user.name + ' - ' + member.team_role.name);
        options('task-member', view.candidates.members, member => member.user.name);

        for (const category of ['requirements', 'members', 'tasks']) {
            const slot = view.selection[category];
            document.getElementById(category + '-target').textContent = slot
                ? 'phase ' + slot.phase_id + ', item ' + slot.config_item_id
                : 'choose a configuration item';
        }

        document.getElementById('requirements').innerHTML = view.requirements.map(link =>
            '<tr><td>' + text(link.requirement.name) + '</td><td>' + text(link.assigned_user.name) + '</td>'
            + '<td><button onclick="send({ action: \'remove_requirement\', link_id: \'' + text(link.id) + '\' })">remove</button></td></tr>'
        ).join('');
        document.getElementById('members').innerHTML = view.members.map(link =>
            '<tr><td>' + text(link.team_member.user.name) + '</td><td>' + text(link.role.name) + '</td>'
            + '<td><button onclick="send({ action: \'remove_member\', link_id: \'' + text(link.id) + '\' })">remove</button></td></tr>'
        ).join('');
        document.getElementById('tasks').innerHTML = view.tasks.map(task =>
            '<tr><td>' + text(task.title) + '</td><td>' + day(task.start_date) + ' to ' + day(task.end_date) + '</td>'
            + '<td><button onclick="send({ action: \'begin_task_edit\', task_id: \'' + text(task.id) + '\' })">edit</button>'
            + ' <button onclick="send({ action: \'remove_task\', task_id: \'' + text(task.id) + '\' })">remove</button></td></tr>'
        ).join('');

        const draft = view.task_draft;
        document.getElementById('task-title').value = draft.title;
        document.getElementById('task-description').value = draft.description;
        document.getElementById('task-member').value = draft.member_id;
        document.getElementById('task-start').value = draft.start_date;
        document.getElementById('task-end').value = draft.end_date;
        document.getElementById('task-save').textContent = view.editing_task ? 'Save changes' : 'Add task';
    }
</script>
</body>
</html>
"#
    .to_string()
}
